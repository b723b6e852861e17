use std::collections::BTreeSet;

use crate::comment::{meaningful_lines, strip_comment, CommentStyle};
use crate::selector::CODEGEN_MARKER;

/// Conversion names enabled by an enum comment.
///
/// Every line after the one equal to [`CODEGEN_MARKER`] names one conversion.
/// Trailing sentence punctuation is ignored, so `string_serialization.` still
/// enables `string_serialization`.
pub fn enabled_conversions(raw_comment: &str) -> BTreeSet<String> {
    let lines = meaningful_lines(strip_comment(raw_comment, CommentStyle::Leading));

    lines
        .iter()
        .skip_while(|line| line.as_str() != CODEGEN_MARKER)
        .skip(1)
        .map(|line| line.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';')).trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lines_after_marker() {
        let raw = "/**\n * @brief Colors.\n * @cpp_codegen\n * string_serialization\n * json_serialization\n */";
        assert_eq!(
            enabled_conversions(raw),
            names(&["json_serialization", "string_serialization"])
        );
    }

    #[test]
    fn test_lines_before_marker_are_ignored() {
        let raw = "/// json_serialization\n/// @cpp_codegen\n/// string_serialization";
        assert_eq!(enabled_conversions(raw), names(&["string_serialization"]));
    }

    #[test]
    fn test_missing_marker_enables_nothing() {
        assert!(enabled_conversions("/** @brief nothing to see */").is_empty());
    }

    #[test]
    fn test_marker_must_be_alone_on_its_line() {
        assert!(enabled_conversions("/** see @cpp_codegen docs\n * json_serialization */").is_empty());
    }

    #[test]
    fn test_trailing_punctuation_is_trimmed() {
        let raw = "/**\n * @cpp_codegen\n * string_serialization.\n */";
        assert_eq!(enabled_conversions(raw), names(&["string_serialization"]));
    }

    #[test]
    fn test_decoration_lines_are_skipped() {
        let raw = "/**\n * @cpp_codegen\n * ---\n * json_serialization\n */";
        assert_eq!(enabled_conversions(raw), names(&["json_serialization"]));
    }
}
