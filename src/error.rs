use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the `"literal" scheme` annotations of one enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("Unexpected symbol `{symbol}` at index {index} in `{line}`, expected `\"`")]
    UnexpectedSymbol {
        symbol: char,
        index: usize,
        line: String,
    },

    #[error("Unterminated value in `{line}`")]
    UnterminatedValue { line: String },

    #[error("Missing scheme name after value at index {index} in `{line}`")]
    EmptyPostfix { index: usize, line: String },
}

/// Errors emitted by the generation pipeline.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Invalid annotation on `{value}` of enum `{enum_name}` (line {line}): {source}")]
    Annotation {
        enum_name: String,
        value: String,
        line: usize,
        #[source]
        source: AnnotationError,
    },

    #[error("Enum `{enum_name}` enables unknown conversion `{name}` (known: {known})")]
    UnknownStrategy {
        enum_name: String,
        name: String,
        known: String,
    },

    #[error("Conversion `{name}` is registered twice")]
    DuplicateStrategy { name: String },

    #[error("`{path}` is not inside any project include directory")]
    NoIncludeRootMatch { path: PathBuf },

    #[error("`{path}` would be generated twice, enum names must be unique per run")]
    OutputCollision { path: PathBuf },

    #[error("Failed to load the C++ grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Failed to parse `{path}`")]
    ParseFailed { path: PathBuf },

    #[error("Failed to access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
