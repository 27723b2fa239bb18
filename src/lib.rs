//! # hex-to-ascii - Decode Hex-Encoded Values in Log Events
//!
//! A log-pipeline filter that finds hex-encoded substrings marked by a prefix
//! (`0x` by default) and replaces them with their decoded text. It was written
//! for auditd records, which log values such as `cmd=` and `data=` as hex.
//!
//! ## Features
//!
//! - Literal prefix matching; the prefix is never interpreted as a pattern
//! - Printable results are inserted verbatim, anything else as a quoted
//!   escaped literal such as `"f\xF6"`
//! - Optional removal of the prefix from decoded spans
//! - Event filter with JSON configuration and bracketed field references
//!
//! ## Usage
//!
//! ```rust
//! use hex_to_ascii::{decode, DecodeOptions, HexDecoder};
//!
//! assert_eq!(decode("0x666F6F626172", "0x", true), "foobar");
//! assert_eq!(decode("data=666F6F and data=626172", "data=", false), "data=foo and data=bar");
//!
//! let decoder = HexDecoder::new(DecodeOptions::default());
//! assert_eq!(decoder.decode("0x66F6F").text, "\"f\\xF6\"");
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod event;
pub mod filter;
pub mod logging;
pub mod util;

pub use crate::config::{DecodeOptions, FilterConfig};
pub use crate::decoder::{decode, DecodeResult, HexDecoder};
pub use crate::error::HexToAsciiError;
pub use crate::event::{Event, FieldRef};
pub use crate::filter::{EventFilter, FilterOutcome, HexToAsciiFilter};
pub use crate::logging::{init_logger, log_info};
