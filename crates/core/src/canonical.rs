//! Canonical JSON encoding shared by block hashing and chain persistence.
//!
//! Two implementations of the ledger only agree on block hashes if they feed
//! byte-identical text into SHA-256. The encoding here is the one produced by a
//! sorted-key JSON encoder with the conventional defaults:
//!
//! - object keys in lexicographic order
//! - `", "` between items and `": "` between key and value
//! - floats in shortest round-trip form, switching to exponent notation when
//!   the decimal exponent is below -4 or at least 16 (`1e-05`, `1e+16`)
//! - every character outside printable ASCII escaped as `\uXXXX`
//!
//! The persisted chain file uses the same scalar rules with four-space
//! indentation, see [`to_document`].

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io::{self, Write};
use thiserror::Error;

/// Errors that can occur while encoding a value.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EncodingError>;

/// Encode a value into its canonical single-line form.
///
/// The value is first lowered into a `serde_json::Value`, whose object maps
/// are ordered by key, so struct field order never leaks into the output.
pub fn to_canonical_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Encode a value into its canonical form as a `String`.
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = to_canonical_vec(value)?;
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Encode a value as an indented document, keeping struct field order.
pub fn to_document<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(writer, DocumentFormatter::new());
    value.serialize(&mut ser)?;
    Ok(())
}

/// Compact formatter with spaced separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_f32<W: ?Sized + Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        write_float(writer, f64::from(value))
    }

    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        write_float(writer, value)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        write_ascii_fragment(writer, fragment)
    }
}

/// Indented formatter for documents on disk.
pub struct DocumentFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl DocumentFormatter<'_> {
    pub fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Default for DocumentFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for DocumentFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_f32<W: ?Sized + Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        write_float(writer, f64::from(value))
    }

    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        write_float(writer, value)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        write_ascii_fragment(writer, fragment)
    }
}

/// Render a float in shortest round-trip form.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{sign}0.0");
    }

    // `{:e}` yields the shortest round-trip digit count, but breaks exact
    // ties away from zero. Re-rendering at that precision rounds them to
    // even, e.g. 1700000000.00390625 becomes "1.7000000000039062e9".
    let shortest = format!("{:e}", value.abs());
    let precision = shortest
        .split('e')
        .next()
        .map_or(0, |m| m.chars().filter(char::is_ascii_digit).count())
        .saturating_sub(1);
    let sci = format!("{:.*e}", precision, value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;
    let n = digits.len() as i32;

    let body = if point <= -4 || point > 16 {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{tail}")
        };
        let exp = point - 1;
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{head}{fraction}e{exp_sign}{:02}", exp.abs())
    } else if point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else if point >= n {
        format!("{digits}{}.0", "0".repeat((point - n) as usize))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    };

    format!("{sign}{body}")
}

fn write_float<W: ?Sized + Write>(writer: &mut W, value: f64) -> io::Result<()> {
    writer.write_all(format_float(value).as_bytes())
}

/// Write a string fragment, escaping anything outside printable ASCII.
///
/// Characters above the basic multilingual plane become a surrogate pair.
fn write_ascii_fragment<W: ?Sized + Write>(writer: &mut W, fragment: &str) -> io::Result<()> {
    let mut start = 0;
    for (i, ch) in fragment.char_indices() {
        if (' '..='~').contains(&ch) {
            continue;
        }
        if start < i {
            writer.write_all(fragment[start..i].as_bytes())?;
        }
        let mut units = [0u16; 2];
        for unit in ch.encode_utf16(&mut units) {
            write!(writer, "\\u{:04x}", unit)?;
        }
        start = i + ch.len_utf8();
    }
    if start < fragment.len() {
        writer.write_all(fragment[start..].as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_with_spaced_separators() {
        let value = json!({ "b": 1, "a": [1, 2], "c": "x" });
        assert_eq!(
            to_canonical_string(&value).unwrap(),
            r#"{"a": [1, 2], "b": 1, "c": "x"}"#
        );
    }

    #[test]
    fn test_struct_field_order_does_not_matter() {
        #[derive(Serialize)]
        struct Forward {
            alpha: u64,
            beta: &'static str,
        }
        #[derive(Serialize)]
        struct Backward {
            beta: &'static str,
            alpha: u64,
        }

        let a = to_canonical_string(&Forward { alpha: 1, beta: "x" }).unwrap();
        let b = to_canonical_string(&Backward { beta: "x", alpha: 1 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-2.25), "-2.25");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(1_700_000_000.123456), "1700000000.123456");
        assert_eq!(format_float(123.0), "123.0");
    }

    #[test]
    fn test_float_ties_round_to_even() {
        // Exactly half-way between two shortest candidates.
        assert_eq!(format_float(1_700_000_000.003_906_25), "1700000000.0039062");
        assert_eq!(format_float(957_321_370_859_031.25), "957321370859031.2");
        assert_eq!(format_float(-957_321_370_859_031.25), "-957321370859031.2");

        let block = json!({ "timestamp": 1_700_000_000.003_906_25 });
        assert_eq!(
            to_canonical_string(&block).unwrap(),
            r#"{"timestamp": 1700000000.0039062}"#
        );
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let value = json!({ "name": "café ☕ 😀\u{7f}" });
        assert_eq!(
            to_canonical_string(&value).unwrap(),
            r#"{"name": "caf\u00e9 \u2615 \ud83d\ude00\u007f"}"#
        );
    }

    #[test]
    fn test_control_characters_are_escaped() {
        let value = json!("a\"b\\c\nd\u{1}");
        assert_eq!(
            to_canonical_string(&value).unwrap(),
            r#""a\"b\\c\nd\u0001""#
        );
    }

    #[test]
    fn test_document_is_indented() {
        let value = json!([{ "a": 1.0 }]);
        let mut out = Vec::new();
        to_document(&mut out, &value).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[\n    {\n        \"a\": 1.0\n    }\n]"
        );
    }
}
