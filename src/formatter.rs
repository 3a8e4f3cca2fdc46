//! Convenience text-to-text formatting: parse then serialize in a named
//! style.

use crate::error::Result;
use crate::options::SerializeOptions;
use crate::parser;
use crate::serializer;

/// A named output style for [`format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TonFormatStyle {
    /// Indented multi-line output with header and type hints.
    #[default]
    Pretty,
    /// Single-line output with no header and nulls omitted.
    Compact,
}

impl TonFormatStyle {
    fn options(self) -> SerializeOptions {
        match self {
            TonFormatStyle::Pretty => SerializeOptions::pretty(),
            TonFormatStyle::Compact => SerializeOptions::compact(),
        }
    }
}

/// Reformats TON text in the given style. Formatting is idempotent:
/// formatting already-formatted text yields the same text.
///
/// # Examples
///
/// ```rust
/// use ton_format::{format, TonFormatStyle};
///
/// let out = format("{ b=2,   a = 1 }", TonFormatStyle::Compact).unwrap();
/// assert_eq!(out, "{b = 2, a = 1}");
/// ```
pub fn format(text: &str, style: TonFormatStyle) -> Result<String> {
    let document = parser::parse(text)?;
    serializer::serialize_with_options(&document, &style.options())
}

/// Like [`format`], additionally sorting properties alphabetically.
pub fn format_sorted(text: &str, style: TonFormatStyle) -> Result<String> {
    let document = parser::parse(text)?;
    let options = style.options().with_sorted_properties(true);
    serializer::serialize_with_options(&document, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_format() {
        let out = format("{ name  = 'Ada' , age=36 }", TonFormatStyle::Compact).unwrap();
        assert_eq!(out, "{name = 'Ada', age = 36}");
    }

    #[test]
    fn test_format_is_idempotent() {
        let once = format("{b = 2, a = {c = 0x10}}", TonFormatStyle::Pretty).unwrap();
        let twice = format(&once, TonFormatStyle::Pretty).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_sorted() {
        let out = format_sorted("{b = 2, a = 1}", TonFormatStyle::Compact).unwrap();
        assert_eq!(out, "{a = 1, b = 2}");
    }

    #[test]
    fn test_format_propagates_parse_errors() {
        assert!(format("{a = }", TonFormatStyle::Compact).is_err());
    }
}
