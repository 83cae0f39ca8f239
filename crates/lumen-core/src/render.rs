//! # Rendering Rules
//!
//! Shared by every formatter so that quoting, escaping, and truncation look
//! the same no matter which type produced the text.
//!
//! ## Conventions
//!
//! - text values are double-quoted; `"` and `\` are escaped
//! - byte buffers render non-printable bytes as 3-digit octal escapes (`\001`)
//! - text cut at a limit gets `...` after the closing quote: `"abc"...`
//! - children cut at a limit end with one `...` entry saying how many are hidden
//! - containers report `size=N`

use std::fmt::Write as _;

use crate::config::OpenModeLabel;
use crate::types::{ChildEntry, ChildKey, Summary};

/// Leaf text for a pointer-like child that could not be followed
pub const INVALID_LEAF: &str = "<invalid>";
/// Leaf text for a null pointer-like child
pub const NULL_LEAF: &str = "<null>";

/// Quote UTF-8 text, cutting it at `max_chars` characters
///
/// `more` marks text that was already cut before it got here (only a prefix
/// was read from memory).
///
/// ```rust
/// use lumen_core::render::quote_text;
///
/// assert_eq!(quote_text("Just", 64, false), "\"Just\"");
/// assert_eq!(quote_text("Just a float?", 4, false), "\"Just\"...");
/// ```
pub fn quote_text(text: &str, max_chars: usize, more: bool) -> String
{
    let mut out = String::with_capacity(text.len().min(max_chars) + 2);
    out.push('"');
    let mut cut = false;
    for (count, c) in text.chars().enumerate() {
        if count == max_chars {
            cut = true;
            break;
        }
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    if cut || more {
        out.push_str("...");
    }
    out
}

/// Quote a byte buffer, cutting it at `max_bytes`
///
/// Printable ASCII is shown as-is; everything else is a 3-digit octal escape.
///
/// ```rust
/// use lumen_core::render::quote_bytes;
///
/// assert_eq!(quote_bytes(b"a\x01b", 64, false), "\"a\\001b\"");
/// ```
pub fn quote_bytes(bytes: &[u8], max_bytes: usize, more: bool) -> String
{
    let shown = &bytes[..bytes.len().min(max_bytes)];
    let mut out = String::with_capacity(shown.len() + 2);
    out.push('"');
    for &b in shown {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out.push('"');
    if more || shown.len() < bytes.len() {
        out.push_str("...");
    }
    out
}

/// Decode little-endian UTF-16 code units, replacing unpaired surrogates
pub fn decode_utf16(bytes: &[u8]) -> String
{
    let units = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// `size=N` summary used by every container
pub fn size_summary(len: usize) -> Summary
{
    Summary::text(format!("size={len}"))
}

/// Render a double the way a debugger would print it
pub fn format_f64(value: f64) -> String
{
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else {
        value.to_string()
    }
}

/// Render a float (shortest representation that round-trips as `f32`)
pub fn format_f32(value: f32) -> String
{
    if value.is_finite() {
        value.to_string()
    } else {
        format_f64(f64::from(value))
    }
}

/// Join the labels of the set bits in table order
///
/// An empty mask renders as `closed`; bits not in the table are ignored.
pub fn join_flags(mask: u32, labels: &[OpenModeLabel]) -> String
{
    let joined = labels
        .iter()
        .filter(|label| mask & label.bit != 0)
        .map(|label| label.label)
        .collect::<Vec<_>>()
        .join("|");
    if joined.is_empty() { "closed".to_string() } else { joined }
}

/// Number of children to enumerate out of `total` under `max_children`
pub fn visible_children(total: usize, max_children: usize) -> usize
{
    total.min(max_children)
}

/// Trailing `...` entry for `hidden` children cut off by the child limit
pub fn truncation_marker(hidden: usize) -> ChildEntry
{
    ChildEntry::leaf(ChildKey::Truncated, format!("<{hidden} more>"))
}

/// Trailing `...` entry for a container whose true length is unknown
pub fn open_ended_marker() -> ChildEntry
{
    ChildEntry::leaf(ChildKey::Truncated, "<more>")
}

/// Sole child of a node whose depth reached the ceiling
pub fn depth_marker(max_depth: usize) -> ChildEntry
{
    ChildEntry::leaf(ChildKey::Truncated, format!("<depth limit {max_depth}>"))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::config::DEFAULT_OPEN_MODE_LABELS;

    #[test]
    fn test_quote_text_escapes_and_truncates()
    {
        assert_eq!(quote_text("", 8, false), "\"\"");
        assert_eq!(quote_text("say \"hi\"\n", 64, false), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote_text("höhö", 2, false), "\"hö\"...");
        assert_eq!(quote_text("abc", 8, true), "\"abc\"...");
    }

    #[test]
    fn test_quote_bytes_uses_octal()
    {
        assert_eq!(
            quote_bytes(b"awfoiaf\x01oaw\x02hifafohwaof", 64, false),
            "\"awfoiaf\\001oaw\\002hifafohwaof\""
        );
        assert_eq!(quote_bytes(&[0xff, 0x00], 64, false), "\"\\377\\000\"");
        assert_eq!(quote_bytes(b"abcdef", 3, false), "\"abc\"...");
    }

    #[test]
    fn test_decode_utf16()
    {
        let bytes: Vec<u8> = "Hä€".encode_utf16().flat_map(u16::to_le_bytes).collect();
        assert_eq!(decode_utf16(&bytes), "Hä€");
        assert_eq!(decode_utf16(&[0x00, 0xd8]), "\u{fffd}");
    }

    #[test]
    fn test_join_flags()
    {
        assert_eq!(join_flags(0x2 | 0x4, DEFAULT_OPEN_MODE_LABELS), "write|append");
        assert_eq!(join_flags(0x3, DEFAULT_OPEN_MODE_LABELS), "read|write");
        assert_eq!(join_flags(0, DEFAULT_OPEN_MODE_LABELS), "closed");
    }

    #[test]
    fn test_floats()
    {
        assert_eq!(format_f32(1.01234), "1.01234");
        assert_eq!(format_f64(0.1234), "0.1234");
        assert_eq!(format_f64(f64::NAN), "nan");
    }
}
