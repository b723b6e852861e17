//! Parser for the per-value annotation mini-language.
//!
//! A value comment holds zero or more `"<literal>" <scheme>` pairs separated by
//! whitespace or newlines, e.g. `//< "red"s "Red" json`. Inside the literal a
//! backslash escapes the next character.

use std::collections::BTreeMap;

use crate::error::AnnotationError;

/// Scheme identifier -> literal.
pub type SchemeLiterals = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Between pairs, waiting for an opening quote.
    Begin,
    /// Inside a quoted literal.
    Value { literal: String },
    /// After the closing quote, reading the scheme identifier.
    Postfix { literal: String },
}

/// State machine consuming one comment line at a time.
///
/// Only `Begin` survives the end of a line: a literal or a scheme identifier
/// cannot span lines.
#[derive(Debug)]
pub struct AnnotationParser {
    state: State,
    result: SchemeLiterals,
}

impl AnnotationParser {
    pub fn new() -> Self {
        Self {
            state: State::Begin,
            result: SchemeLiterals::new(),
        }
    }

    pub fn feed_line(&mut self, line: &str) -> Result<(), AnnotationError> {
        let chars: Vec<char> = line.chars().collect();
        let mut cursor = 0;

        while cursor < chars.len() {
            let state = std::mem::replace(&mut self.state, State::Begin);
            let (next_state, next_cursor) = match state {
                State::Begin => begin(&chars, cursor, line)?,
                State::Value { literal } => value(&chars, cursor, literal, line)?,
                State::Postfix { literal } => {
                    let (scheme, next_cursor) = postfix(&chars, cursor, line)?;
                    self.result.insert(scheme, literal);
                    (State::Begin, next_cursor)
                }
            };
            self.state = next_state;
            cursor = next_cursor;
        }

        match &self.state {
            State::Begin => Ok(()),
            State::Value { .. } => Err(AnnotationError::UnterminatedValue {
                line: line.to_string(),
            }),
            State::Postfix { .. } => Err(AnnotationError::EmptyPostfix {
                index: chars.len(),
                line: line.to_string(),
            }),
        }
    }

    pub fn finish(self) -> SchemeLiterals {
        self.result
    }
}

impl Default for AnnotationParser {
    fn default() -> Self {
        Self::new()
    }
}

fn begin(chars: &[char], mut cursor: usize, line: &str) -> Result<(State, usize), AnnotationError> {
    while cursor < chars.len() && chars[cursor].is_whitespace() {
        cursor += 1;
    }

    match chars.get(cursor) {
        None => Ok((State::Begin, cursor)),
        Some('"') => Ok((
            State::Value {
                literal: String::new(),
            },
            cursor + 1,
        )),
        Some(&symbol) => Err(AnnotationError::UnexpectedSymbol {
            symbol,
            index: cursor,
            line: line.to_string(),
        }),
    }
}

fn value(
    chars: &[char],
    mut cursor: usize,
    mut literal: String,
    line: &str,
) -> Result<(State, usize), AnnotationError> {
    while cursor < chars.len() {
        match chars[cursor] {
            '"' => return Ok((State::Postfix { literal }, cursor + 1)),
            '\\' => {
                let escaped = chars.get(cursor + 1).ok_or_else(|| {
                    AnnotationError::UnterminatedValue {
                        line: line.to_string(),
                    }
                })?;
                literal.push(*escaped);
                cursor += 2;
            }
            c => {
                literal.push(c);
                cursor += 1;
            }
        }
    }

    Err(AnnotationError::UnterminatedValue {
        line: line.to_string(),
    })
}

fn postfix(chars: &[char], mut cursor: usize, line: &str) -> Result<(String, usize), AnnotationError> {
    while cursor < chars.len() && chars[cursor].is_whitespace() {
        cursor += 1;
    }

    let start = cursor;
    while cursor < chars.len() && !chars[cursor].is_whitespace() {
        cursor += 1;
    }

    if start == cursor {
        return Err(AnnotationError::EmptyPostfix {
            index: start,
            line: line.to_string(),
        });
    }

    Ok((chars[start..cursor].iter().collect(), cursor))
}

/// Parse the stripped comment lines of one enum value.
pub fn parse_annotations<S: AsRef<str>>(lines: &[S]) -> Result<SchemeLiterals, AnnotationError> {
    let mut parser = AnnotationParser::new();
    for line in lines {
        parser.feed_line(line.as_ref())?;
    }
    Ok(parser.finish())
}
