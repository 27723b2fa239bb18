//! # Hex Run Decoder
//!
//! Finds every occurrence of a literal prefix followed by a maximal run of hex
//! digits, decodes the run and splices the rendered bytes back into the text.
//!
//! The prefix is located with a plain substring search and the digit run is
//! parsed with `nom`, so prefixes containing characters such as `.`, `*` or
//! `(` match only themselves.

use std::borrow::Cow;

use nom::{bytes::complete::tag, character::complete::hex_digit1, sequence::preceded, IResult};

use crate::config::DecodeOptions;
use crate::util::hex::{decode_pairs, format_hex_compact, render_bytes};

/// Outcome of decoding one text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult<'a> {
    /// The text with all substitutions applied; borrowed when nothing matched.
    pub text: Cow<'a, str>,
    /// Number of prefix + hex runs replaced.
    pub substitutions: usize,
    /// How many of those replacements used the escaped-literal rendering.
    pub escaped: usize,
}

impl DecodeResult<'_> {
    pub fn is_unchanged(&self) -> bool {
        self.substitutions == 0
    }

    pub fn into_string(self) -> String {
        self.text.into_owned()
    }
}

/// Parse `prefix` followed by one or more hex digits, yielding the digits.
pub fn hex_run<'a>(prefix: &str, input: &'a str) -> IResult<&'a str, &'a str> {
    preceded(tag(prefix), hex_digit1)(input)
}

/// Stateless decoder bound to one set of options.
#[derive(Debug, Clone, Default)]
pub struct HexDecoder {
    options: DecodeOptions,
}

impl HexDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode every prefixed hex run in `text`.
    ///
    /// ```rust
    /// use hex_to_ascii::{DecodeOptions, HexDecoder};
    ///
    /// let decoder = HexDecoder::new(DecodeOptions::new("cmd=", true).unwrap());
    /// let result = decoder.decode("cwd=\"/\" cmd=2F62696E2F66696E64 res=success");
    /// assert_eq!(result.text, "cwd=\"/\" /bin/find res=success");
    /// assert_eq!(result.substitutions, 1);
    /// ```
    pub fn decode<'a>(&self, text: &'a str) -> DecodeResult<'a> {
        let prefix = self.options.prefix();
        let mut out = String::new();
        let mut copied = 0;
        let mut cursor = 0;
        let mut substitutions = 0;
        let mut escaped = 0;

        while let Some(found) = text[cursor..].find(prefix) {
            let start = cursor + found;
            let digits = match hex_run(prefix, &text[start..]) {
                Ok((_, digits)) => digits,
                Err(_) => {
                    // Not followed by a hex digit; retry one character later.
                    cursor = start + text[start..].chars().next().map_or(1, char::len_utf8);
                    continue;
                }
            };
            let end = start + prefix.len() + digits.len();

            let bytes = decode_pairs(digits);
            let rendered = render_bytes(&bytes);
            log::trace!(
                "Decoded {prefix}{digits} at {start}..{end} -> [{}]",
                format_hex_compact(&bytes)
            );
            if rendered.is_escaped() {
                log::debug!("Hex run at {start} is not printable, rendering escaped literal");
                escaped += 1;
            }

            out.push_str(&text[copied..start]);
            if !self.options.strip_prefix() {
                out.push_str(prefix);
            }
            out.push_str(rendered.as_str());
            copied = end;
            cursor = end;
            substitutions += 1;
        }

        if substitutions == 0 {
            return DecodeResult {
                text: Cow::Borrowed(text),
                substitutions,
                escaped,
            };
        }

        out.push_str(&text[copied..]);
        DecodeResult {
            text: Cow::Owned(out),
            substitutions,
            escaped,
        }
    }
}

/// Decode prefixed hex runs in `text` with the given prefix.
///
/// An empty prefix is a configuration error; it is logged and the input is
/// returned unchanged.
///
/// ```rust
/// assert_eq!(hex_to_ascii::decode("0x666F6F626172", "0x", true), "foobar");
/// assert_eq!(hex_to_ascii::decode("data=666F6F", "data=", false), "data=foo");
/// ```
pub fn decode(text: &str, prefix: &str, strip_prefix: bool) -> String {
    match DecodeOptions::new(prefix, strip_prefix) {
        Ok(options) => HexDecoder::new(options).decode(text).into_string(),
        Err(e) => {
            log::warn!("{e}; leaving text unchanged");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(prefix: &str, strip: bool) -> HexDecoder {
        HexDecoder::new(DecodeOptions::new(prefix, strip).unwrap())
    }

    #[test]
    fn test_hex_run_parser() {
        assert_eq!(hex_run("0x", "0x41zz"), Ok(("zz", "41")));
        assert!(hex_run("0x", "0xzz").is_err());
        assert!(hex_run("0x", "41").is_err());
    }

    #[test]
    fn test_unchanged_text_is_borrowed() {
        let result = decoder("0x", true).decode("a string with no hex");
        assert!(matches!(result.text, Cow::Borrowed(_)));
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_prefix_without_digits_is_skipped() {
        let result = decoder("0x", true).decode("0xZZ then 0x41");
        assert_eq!(result.text, "0xZZ then A");
        assert_eq!(result.substitutions, 1);
    }

    #[test]
    fn test_run_is_maximal() {
        assert_eq!(decoder("0x", true).decode("0x414243!").text, "ABC!");
    }

    #[test]
    fn test_single_digit_run_decodes_to_nothing() {
        assert_eq!(decoder("0x", true).decode("[0x4]").text, "[]");
        assert_eq!(decoder("0x", false).decode("[0x4]").text, "[0x]");
    }

    #[test]
    fn test_escaped_count() {
        let result = decoder("0x", true).decode("0x41 0xF6 0x0A");
        assert_eq!(result.text, "A \"\\xF6\" \"\\n\"");
        assert_eq!(result.substitutions, 3);
        assert_eq!(result.escaped, 2);
    }

    #[test]
    fn test_regex_metacharacters_in_prefix() {
        let d = decoder(".*", true);
        assert_eq!(d.decode("x.*41 ab").text, "xA ab");
        assert_eq!(d.decode("xx41").text, "xx41");
    }

    #[test]
    fn test_multibyte_text_around_matches() {
        let d = decoder("→", false);
        assert_eq!(d.decode("é→6869 ü→").text, "é→hi ü→");
    }

    #[test]
    fn test_overlapping_prefix_candidates() {
        // "aa" at 0 is followed by "a1", a hex run.
        assert_eq!(decoder("aa", true).decode("aaa1").text, "\"\\xA1\"");
    }

    #[test]
    fn test_free_function_empty_prefix_is_identity() {
        assert_eq!(decode("0x41", "", true), "0x41");
    }
}
