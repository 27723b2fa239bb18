//! # Hex Decoding and Rendering Utilities
//!
//! This module provides the byte-level half of the hex-to-ascii filter:
//! turning a run of hex digits into raw bytes, and rendering raw bytes back
//! into text that is always safe to place in a log event.
//!
//! ## Features
//!
//! - Pairwise hex decoding using the `hex` crate
//! - Lenient handling of odd-length runs (the unpaired digit is dropped)
//! - Two-tier rendering: printable ASCII passes through, anything else is
//!   shown as a quoted escaped literal
//! - Compact hex formatting for debug logs
//!
//! ## Usage
//!
//! ```rust
//! use hex_to_ascii::util::hex::{decode_pairs, render_bytes, Rendered};
//!
//! let bytes = decode_pairs("666F6F");
//! assert_eq!(bytes, b"foo");
//! assert_eq!(render_bytes(&bytes), Rendered::Text("foo".to_string()));
//!
//! let bytes = decode_pairs("66F6F");
//! assert_eq!(render_bytes(&bytes).as_str(), "\"f\\xF6\"");
//! ```

use std::fmt::Write;

/// Result of rendering a decoded byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Every byte was printable ASCII; the text is the bytes verbatim.
    Text(String),
    /// At least one byte was not printable; the text is a quoted escaped literal.
    Escaped(String),
}

impl Rendered {
    /// The rendered text, whichever tier produced it.
    pub fn as_str(&self) -> &str {
        match self {
            Rendered::Text(s) | Rendered::Escaped(s) => s,
        }
    }

    /// Whether the bytes needed the escaped-literal rendering.
    pub fn is_escaped(&self) -> bool {
        matches!(self, Rendered::Escaped(_))
    }
}

/// Decode a run of ASCII hex digits two at a time.
///
/// A trailing unpaired digit is ignored, so `"66F6F"` yields `[0x66, 0xF6]`.
/// Non-hex input never reaches this function from the decoder; if it does,
/// the result is empty rather than a panic.
pub fn decode_pairs(digits: &str) -> Vec<u8> {
    let even = digits.len() - digits.len() % 2;
    match digits.get(..even) {
        Some(paired) => hex::decode(paired).unwrap_or_else(|e| {
            log::debug!("Ignoring undecodable hex run {digits:?}: {e}");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

/// Whether every byte is printable ASCII (space through `~`).
pub fn is_printable(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (0x20..=0x7E).contains(&b))
}

/// Render bytes as a double-quoted literal with non-printable bytes escaped.
///
/// `"` and `\` are backslash-escaped, tab/newline/carriage return use their
/// named escapes and every other non-printable byte becomes `\xHH`.
pub fn escape_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4 + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{byte:02X}");
            }
        }
    }
    out.push('"');
    out
}

/// Choose between verbatim text and the escaped literal for decoded bytes.
pub fn render_bytes(bytes: &[u8]) -> Rendered {
    if is_printable(bytes) {
        // Printable ASCII is always valid UTF-8.
        Rendered::Text(bytes.iter().map(|&b| b as char).collect())
    } else {
        Rendered::Escaped(escape_literal(bytes))
    }
}

/// Format bytes for compact display (useful for logs)
///
/// Formats data as "66 6f 6f" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
