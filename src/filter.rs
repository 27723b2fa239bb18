//! # Hex-to-ASCII Filter Stage
//!
//! Wires the decoder into a log pipeline: reads one field of an [`Event`],
//! decodes prefixed hex runs and writes the result back in place.
//!
//! Originally intended for auditd records, which log some values hex-encoded:
//!
//! ```rust
//! use hex_to_ascii::{Event, FilterConfig, HexToAsciiFilter};
//!
//! let config = FilterConfig { prefix: "data=".to_string(), ..FilterConfig::default() };
//! let filter = HexToAsciiFilter::new(config).unwrap();
//!
//! let mut event = Event::from_message("tty pid=8106 comm=\"bash\" data=6364202F6F70742F");
//! filter.apply(&mut event);
//! assert_eq!(
//!     event.fields()["message"],
//!     "tty pid=8106 comm=\"bash\" cd /opt/"
//! );
//! ```

use serde_json::Value;

use crate::config::FilterConfig;
use crate::decoder::HexDecoder;
use crate::error::HexToAsciiError;
use crate::event::{json_type_name, Event, FieldRef};

/// What a filter did to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The field was a string and has been rewritten (possibly unchanged).
    Decoded { substitutions: usize },
    /// The event has no such field.
    FieldMissing,
    /// The field exists but does not hold a string.
    NotAString,
}

impl FilterOutcome {
    /// Whether the filter ran on the event's field.
    pub fn matched(&self) -> bool {
        matches!(self, FilterOutcome::Decoded { .. })
    }
}

/// A pipeline stage that mutates events in place.
///
/// Implementations must be stateless with respect to events so one instance
/// can be shared between worker threads.
pub trait EventFilter: Send + Sync {
    /// Name used in configuration and logs.
    fn name(&self) -> &'static str;

    fn filter(&self, event: &mut Event) -> FilterOutcome;
}

/// Decodes hex runs in one field of each event.
#[derive(Debug, Clone)]
pub struct HexToAsciiFilter {
    field: FieldRef,
    decoder: HexDecoder,
    add_tag: Vec<String>,
}

impl HexToAsciiFilter {
    /// Validate the configuration and build the filter.
    pub fn new(config: FilterConfig) -> Result<Self, HexToAsciiError> {
        config.validate()?;
        let field = config.field.parse::<FieldRef>()?;
        let decoder = HexDecoder::new(config.decode_options()?);
        log::debug!(
            "Registered hex_to_ascii filter: field={field}, prefix={:?}, remove_prefix={}",
            config.prefix,
            config.remove_prefix
        );
        Ok(Self {
            field,
            decoder,
            add_tag: config.add_tag,
        })
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn decoder(&self) -> &HexDecoder {
        &self.decoder
    }

    /// Run the filter on one event.
    pub fn apply(&self, event: &mut Event) -> FilterOutcome {
        let (decoded, substitutions) = match event.get(&self.field) {
            None => {
                log::debug!("Field {} not present, skipping event", self.field);
                return FilterOutcome::FieldMissing;
            }
            Some(Value::String(text)) => {
                let result = self.decoder.decode(text);
                let substitutions = result.substitutions;
                (result.into_string(), substitutions)
            }
            Some(other) => {
                log::warn!(
                    "Field {} holds a {}, not a string; skipping event",
                    self.field,
                    json_type_name(other)
                );
                return FilterOutcome::NotAString;
            }
        };

        event.set(&self.field, Value::String(decoded));
        for tag in &self.add_tag {
            event.add_tag(tag);
        }
        FilterOutcome::Decoded { substitutions }
    }
}

impl EventFilter for HexToAsciiFilter {
    fn name(&self) -> &'static str {
        "hex_to_ascii"
    }

    fn filter(&self, event: &mut Event) -> FilterOutcome {
        self.apply(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter_with(json: &str) -> HexToAsciiFilter {
        HexToAsciiFilter::new(FilterConfig::from_json_str(json).unwrap()).unwrap()
    }

    #[test]
    fn test_decodes_message() {
        let filter = filter_with("{}");
        let mut event = Event::from_message("0x6364202F6F70742F");
        assert_eq!(filter.apply(&mut event), FilterOutcome::Decoded { substitutions: 1 });
        assert_eq!(event.fields()["message"], "cd /opt/");
    }

    #[test]
    fn test_missing_and_non_string_fields() {
        let filter = filter_with(r#"{"field": "cmd"}"#);
        let mut event = Event::from_message("0x41");
        assert_eq!(filter.apply(&mut event), FilterOutcome::FieldMissing);
        assert_eq!(event.fields()["message"], "0x41");

        let mut event = Event::from_json_str(r#"{"cmd": 42}"#).unwrap();
        assert_eq!(filter.apply(&mut event), FilterOutcome::NotAString);
        assert_eq!(event.fields()["cmd"], json!(42));
    }

    #[test]
    fn test_tags_added_even_without_matches() {
        let filter = filter_with(r#"{"add_tag": ["hex_decoded"]}"#);
        let mut event = Event::from_message("plain text");
        assert_eq!(filter.apply(&mut event), FilterOutcome::Decoded { substitutions: 0 });
        assert_eq!(event.tags(), vec!["hex_decoded"]);
    }

    #[test]
    fn test_invalid_field_reference() {
        let config = FilterConfig {
            field: "[a][".to_string(),
            ..FilterConfig::default()
        };
        assert!(matches!(
            HexToAsciiFilter::new(config),
            Err(HexToAsciiError::InvalidFieldReference(_))
        ));
    }

    #[test]
    fn test_trait_object() {
        let filter: Box<dyn EventFilter> = Box::new(filter_with("{}"));
        assert_eq!(filter.name(), "hex_to_ascii");
        let mut event = Event::from_message("0x4869");
        assert!(filter.filter(&mut event).matched());
    }
}
