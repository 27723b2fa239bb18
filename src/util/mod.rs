//! # Utility Modules
//!
//! Byte-level helpers shared by the decoder and the logging of decoded runs.

pub mod hex;

pub use hex::{decode_pairs, escape_literal, format_hex_compact, is_printable, render_bytes, Rendered};
