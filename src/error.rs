//! # Error Handling
//!
//! This module defines the HexToAsciiError enum, which represents the different
//! error types that can occur in the hex-to-ascii crate.
//!
//! Decoding itself never fails: malformed hex and binary output degrade to a
//! textual rendering. Errors only arise while building a filter from its
//! configuration or while reading events.

use thiserror::Error;

/// Represents the different error types that can occur in the hex-to-ascii crate.
#[derive(Debug, Error)]
pub enum HexToAsciiError {
    /// The configured prefix is empty.
    #[error("Prefix must not be empty")]
    EmptyPrefix,

    /// The configured field reference is empty.
    #[error("Field must not be empty")]
    EmptyField,

    /// A configuration option has a value of the wrong type or shape.
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// A field reference could not be parsed (e.g. `[a][b` or `[]`).
    #[error("Invalid field reference: {0}")]
    InvalidFieldReference(String),

    /// The configuration document is not valid JSON or has unknown keys.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Reading a configuration file or input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input line could not be turned into an event.
    #[error("Event parse error: {0}")]
    EventParse(String),
}
