pub mod annotation;
pub mod ast;
pub mod comment;
pub mod config;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod scanner;
pub mod selector;
pub mod writer;

pub use error::{AnnotationError, CodegenError};
pub use pipeline::{Pipeline, RunOptions, RunStats};
