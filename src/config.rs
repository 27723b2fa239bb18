//! # Filter Configuration
//!
//! `FilterConfig` is the user-facing option set of the filter, loaded from a
//! JSON document. `DecodeOptions` is the validated subset the decoder needs,
//! fixed at construction and passed explicitly into every decode.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::HexToAsciiError;

pub const DEFAULT_FIELD: &str = "message";
pub const DEFAULT_PREFIX: &str = "0x";

/// Options accepted by the hex-to-ascii filter.
///
/// Every key is optional; unknown keys are rejected.
///
/// ```rust
/// use hex_to_ascii::config::FilterConfig;
///
/// let config = FilterConfig::from_json_str(r#"{"prefix": "data=", "remove_prefix": "false"}"#).unwrap();
/// assert_eq!(config.field, "message");
/// assert_eq!(config.prefix, "data=");
/// assert!(!config.remove_prefix);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Field reference to operate on.
    pub field: String,
    /// Literal marker preceding a hex run, e.g. `0x`, `data=` or `cmd=`.
    pub prefix: String,
    /// Remove the prefix from decoded spans: `0x6466` becomes `df` when true
    /// and `0xdf` when false.
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub remove_prefix: bool,
    /// Tags appended to the event after the filter has run.
    pub add_tag: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            remove_prefix: true,
            add_tag: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, HexToAsciiError> {
        let config: FilterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HexToAsciiError> {
        let path = path.as_ref();
        log::debug!("Loading filter configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations the decoder cannot run with.
    pub fn validate(&self) -> Result<(), HexToAsciiError> {
        if self.prefix.is_empty() {
            return Err(HexToAsciiError::EmptyPrefix);
        }
        if self.field.is_empty() {
            return Err(HexToAsciiError::EmptyField);
        }
        if let Some(tag) = self.add_tag.iter().find(|t| t.is_empty()) {
            return Err(HexToAsciiError::InvalidOption {
                option: "add_tag".to_string(),
                reason: format!("empty tag {tag:?}"),
            });
        }
        Ok(())
    }

    /// The decoder options derived from this configuration.
    pub fn decode_options(&self) -> Result<DecodeOptions, HexToAsciiError> {
        DecodeOptions::new(self.prefix.clone(), self.remove_prefix)
    }
}

/// Immutable decoder options. The prefix is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    prefix: String,
    strip_prefix: bool,
}

impl DecodeOptions {
    pub fn new(prefix: impl Into<String>, strip_prefix: bool) -> Result<Self, HexToAsciiError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(HexToAsciiError::EmptyPrefix);
        }
        Ok(Self {
            prefix,
            strip_prefix,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn strip_prefix(&self) -> bool {
        self.strip_prefix
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            strip_prefix: true,
        }
    }
}

/// Accept `true`/`false` as JSON booleans or as (case-insensitive) strings.
fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientBool;

    impl<'de> Visitor<'de> for LenientBool {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or the string \"true\" or \"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(LenientBool)
}
