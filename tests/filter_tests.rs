//! Integration tests for the hex_to_ascii event filter.

use hex_to_ascii::{Event, EventFilter, FilterConfig, FilterOutcome, HexToAsciiFilter};
use serde_json::json;

fn filter(json: &str) -> HexToAsciiFilter {
    HexToAsciiFilter::new(FilterConfig::from_json_str(json).unwrap()).unwrap()
}

#[test]
fn test_filter_with_explicit_config() {
    let filter = filter(r#"{"field": "message", "prefix": "0x", "remove_prefix": "true"}"#);
    let mut event = Event::from_message("0x666F6F626172");
    filter.apply(&mut event);
    assert_eq!(event.fields()["message"], "foobar");
}

#[test]
fn test_filter_defaults_leave_plain_text() {
    let filter = filter("{}");
    let mut event = Event::from_message("a string with no hex");
    assert_eq!(filter.apply(&mut event), FilterOutcome::Decoded { substitutions: 0 });
    assert_eq!(event.fields()["message"], "a string with no hex");
}

#[test]
fn test_filter_keeps_prefix() {
    let filter = filter(r#"{"prefix": "data=", "remove_prefix": "false"}"#);
    let mut event = Event::from_message("data=666F6F and data=626172");
    assert_eq!(filter.apply(&mut event), FilterOutcome::Decoded { substitutions: 2 });
    assert_eq!(event.fields()["message"], "data=foo and data=bar");
}

#[test]
fn test_filter_unprintable() {
    let filter = filter("{}");
    let mut event = Event::from_message("0x66F6F");
    filter.apply(&mut event);
    assert_eq!(event.fields()["message"], "\"f\\xF6\"");
}

#[test]
fn test_filter_nested_field_and_tags() {
    let filter = filter(r#"{"field": "[auditd][data]", "add_tag": ["hex"]}"#);
    let mut event = Event::from_json_str(r#"{"auditd": {"data": "0x6C73"}, "message": "0x41"}"#).unwrap();
    assert!(filter.apply(&mut event).matched());
    assert_eq!(event.fields()["auditd"], json!({"data": "ls"}));
    assert_eq!(event.fields()["message"], "0x41");
    assert_eq!(event.tags(), vec!["hex"]);
}

#[test]
fn test_filter_skips_non_string_without_tagging() {
    let filter = filter(r#"{"add_tag": ["hex"]}"#);
    let mut event = Event::from_json_str(r#"{"message": ["0x41"]}"#).unwrap();
    assert_eq!(filter.apply(&mut event), FilterOutcome::NotAString);
    assert!(event.tags().is_empty());
}

#[test]
fn test_filter_shared_across_threads() {
    let filter = std::sync::Arc::new(filter(r#"{"prefix": "cmd="}"#));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let filter = std::sync::Arc::clone(&filter);
            std::thread::spawn(move || {
                let mut event = Event::from_message("cmd=6C73202D6C61");
                filter.filter(&mut event);
                event.fields()["message"].clone()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), json!("ls -la"));
    }
}
