use regex::Regex;
use std::sync::LazyLock;

static CLOSER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*+/\s*$").expect("valid closer regex"));

static LEADING_OPENER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:/\*[*!]?|//[/!]?|\*+)").expect("valid opener regex"));

// Same openers, plus the `<` Doxygen uses for comments documenting the previous member.
static TRAILING_OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:/\*[*!]?|//[/!]?)<?|\*+)").expect("valid opener regex")
});

/// How a comment is attached to the declaration it documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/** ... */`, `/// ...` placed before the declaration.
    Leading,
    /// `//< ...`, `/**< ... */` placed after the declaration.
    Trailing,
}

/// Strip comment decoration from raw comment text.
///
/// Every physical line loses its opener (`/**`, `///`, `//<`, ...), its closer
/// (`*/`) and the ` * ` gutter of block comments. Lines left empty are dropped.
pub fn strip_comment(raw: &str, style: CommentStyle) -> Vec<String> {
    let opener = match style {
        CommentStyle::Leading => &*LEADING_OPENER_RE,
        CommentStyle::Trailing => &*TRAILING_OPENER_RE,
    };

    raw.lines()
        .map(|line| {
            let line = CLOSER_RE.replace(line, "");
            opener.replace(&line, "").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Keep only lines carrying at least one letter or digit.
pub fn meaningful_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| line.chars().any(char::is_alphanumeric))
        .collect()
}
