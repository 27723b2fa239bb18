#![no_main]

use hex_to_ascii::{decode, Event, FilterConfig, HexToAsciiFilter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Default prefix and a few auditd prefixes
    for prefix in ["0x", "data=", "cmd=", "x"] {
        let stripped = decode(text, prefix, true);
        let kept = decode(text, prefix, false);
        assert!(kept.len() >= stripped.len());
    }

    // Use the first bytes as the prefix itself
    if let Some((split, _)) = text.char_indices().nth(2) {
        let (prefix, rest) = text.split_at(split);
        let _ = decode(rest, prefix, true);
    }

    // Whole lines as JSON events
    if let Ok(mut event) = Event::from_json_str(text) {
        if let Ok(filter) = HexToAsciiFilter::new(FilterConfig::default()) {
            let _ = filter.apply(&mut event);
            let _ = event.to_json_string();
        }
    }
});
