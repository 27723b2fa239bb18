//! # Structured Log Events
//!
//! A minimal event record backed by a JSON object, with field access by
//! reference. A reference is either a bare top-level name (`message`) or a
//! bracketed path (`[auditd][data]`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HexToAsciiError;

/// Name of the field that holds event tags.
pub const TAGS_FIELD: &str = "tags";

/// Parsed field reference: the path of keys from the event root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    path: Vec<String>,
}

impl FieldRef {
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

impl FromStr for FieldRef {
    type Err = HexToAsciiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HexToAsciiError::EmptyField);
        }
        if !s.starts_with('[') {
            return Ok(Self {
                path: vec![s.to_string()],
            });
        }

        let invalid = || HexToAsciiError::InvalidFieldReference(s.to_string());
        let mut path = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
            let close = inner.find(']').ok_or_else(invalid)?;
            let key = &inner[..close];
            if key.is_empty() || key.contains('[') {
                return Err(invalid());
            }
            path.push(key.to_string());
            rest = &inner[close + 1..];
        }
        Ok(Self { path })
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_slice() {
            [single] => f.write_str(single),
            path => path.iter().try_for_each(|key| write!(f, "[{key}]")),
        }
    }
}

/// A structured log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// An event whose `message` field holds `message`.
    pub fn from_message(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(message.into()));
        Self { fields }
    }

    /// Parse a JSON object into an event.
    pub fn from_json_str(json: &str) -> Result<Self, HexToAsciiError> {
        serde_json::from_str(json).map_err(|e| HexToAsciiError::EventParse(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, HexToAsciiError> {
        serde_json::to_string(self).map_err(|e| HexToAsciiError::EventParse(e.to_string()))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &FieldRef) -> Option<&Value> {
        let (first, rest) = field.path.split_first()?;
        rest.iter()
            .try_fold(self.fields.get(first)?, |value, key| value.as_object()?.get(key))
    }

    /// Set a field, creating intermediate objects as needed.
    ///
    /// An intermediate value that is not an object is replaced by one.
    pub fn set(&mut self, field: &FieldRef, value: Value) {
        let Some((last, parents)) = field.path.split_last() else {
            return;
        };
        let mut current = &mut self.fields;
        for key in parents {
            let entry = current
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!("entry was just made an object"),
            };
        }
        current.insert(last.clone(), value);
    }

    /// Tags currently on the event.
    pub fn tags(&self) -> Vec<&str> {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) => tags.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(tag)) => vec![tag.as_str()],
            _ => Vec::new(),
        }
    }

    /// Append a tag unless already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tags = self
            .fields
            .entry(TAGS_FIELD.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::String(single) = tags {
            *tags = Value::Array(vec![Value::String(std::mem::take(single))]);
        }
        match tags {
            Value::Array(list) => {
                if !list.iter().any(|t| t.as_str() == Some(tag)) {
                    list.push(Value::String(tag.to_string()));
                }
            }
            other => {
                log::warn!(
                    "Replacing non-array '{TAGS_FIELD}' field ({}) to add tag {tag:?}",
                    json_type_name(other)
                );
                *other = Value::Array(vec![Value::String(tag.to_string())]);
            }
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_refs() {
        assert_eq!("message".parse::<FieldRef>().unwrap().path(), ["message"]);
        assert_eq!(
            "[auditd][data]".parse::<FieldRef>().unwrap().path(),
            ["auditd", "data"]
        );
        assert!("[a][b".parse::<FieldRef>().is_err());
        assert!("[]".parse::<FieldRef>().is_err());
        assert!("[a]x".parse::<FieldRef>().is_err());
        assert!(matches!("".parse::<FieldRef>(), Err(HexToAsciiError::EmptyField)));
    }

    #[test]
    fn test_field_ref_display() {
        assert_eq!("message".parse::<FieldRef>().unwrap().to_string(), "message");
        assert_eq!("[a][b]".parse::<FieldRef>().unwrap().to_string(), "[a][b]");
    }

    #[test]
    fn test_get_set_nested() {
        let mut event = Event::new();
        let field: FieldRef = "[audit][cmd]".parse().unwrap();
        assert!(event.get(&field).is_none());
        event.set(&field, json!("ls"));
        assert_eq!(event.get(&field), Some(&json!("ls")));
        assert_eq!(event.fields()["audit"], json!({"cmd": "ls"}));
    }

    #[test]
    fn test_set_replaces_non_object_parent() {
        let mut event = Event::from_json_str(r#"{"audit": 5}"#).unwrap();
        event.set(&"[audit][cmd]".parse().unwrap(), json!("x"));
        assert_eq!(event.fields()["audit"], json!({"cmd": "x"}));
    }

    #[test]
    fn test_tags() {
        let mut event = Event::from_message("m");
        assert!(event.tags().is_empty());
        event.add_tag("hex_decoded");
        event.add_tag("hex_decoded");
        assert_eq!(event.tags(), vec!["hex_decoded"]);

        let mut event = Event::from_json_str(r#"{"tags": "first"}"#).unwrap();
        event.add_tag("second");
        assert_eq!(event.tags(), vec!["first", "second"]);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            Event::from_json_str("[1, 2]"),
            Err(HexToAsciiError::EventParse(_))
        ));
        assert!(Event::from_json_str("not json").is_err());
    }
}
