mod to_json;
mod to_string;

pub use to_json::ToJsonConversion;
pub use to_string::ToStringConversion;

use std::collections::{BTreeMap, BTreeSet};

use super::model::{EnumDeclaration, FileInfo, GenerationConfig, ValueLiteral};
use crate::error::CodegenError;

/// Rendered fragment of one conversion for one enum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub header_text: String,
    pub source_text: String,
    pub header_includes: BTreeSet<String>,
    pub source_includes: BTreeSet<String>,
}

/// A named serialization scheme for enums.
///
/// `name` is what an enum comment lists after the marker, `value_postfix` is
/// the scheme identifier used in value annotations (`"red"json`).
pub trait Conversion: Send + Sync {
    fn name(&self) -> &'static str;

    fn value_postfix(&self) -> &'static str;

    fn convert(
        &self,
        values: &[ValueLiteral],
        enum_decl: &EnumDeclaration,
        file_info: &FileInfo,
        config: &GenerationConfig,
    ) -> ConversionResult;
}

/// Conversions by name, iterated in name order.
pub struct ConversionRegistry {
    conversions: BTreeMap<&'static str, Box<dyn Conversion>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self {
            conversions: BTreeMap::new(),
        }
    }

    /// Registry with every built-in conversion.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.conversions.insert(
            ToStringConversion.name(),
            Box::new(ToStringConversion),
        );
        registry
            .conversions
            .insert(ToJsonConversion.name(), Box::new(ToJsonConversion));
        registry
    }

    pub fn register(&mut self, conversion: Box<dyn Conversion>) -> Result<(), CodegenError> {
        let name = conversion.name();
        if self.conversions.contains_key(name) {
            return Err(CodegenError::DuplicateStrategy {
                name: name.to_string(),
            });
        }
        self.conversions.insert(name, conversion);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Conversion> {
        self.conversions.get(name).map(|conversion| conversion.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.conversions.keys().copied().collect()
    }

    /// Look up every enabled conversion; an unregistered name is an error.
    pub fn resolve(
        &self,
        config: &GenerationConfig,
        enum_name: &str,
    ) -> Result<Vec<&dyn Conversion>, CodegenError> {
        config
            .enabled
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| CodegenError::UnknownStrategy {
                    enum_name: enum_name.to_string(),
                    name: name.clone(),
                    known: self.names().join(", "),
                })
            })
            .collect()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// C++ string literal for `text`.
///
/// JSON string escaping is also valid C++ escaping.
pub fn cpp_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Wrap `body` in `namespace a::b { ... }`, or return it as is at global scope.
pub fn in_namespace(namespace: &[String], body: &str) -> String {
    if namespace.is_empty() {
        return body.to_string();
    }
    let name = namespace.join("::");
    format!("namespace {name} {{\n\n{body}\n}}  // namespace {name}\n")
}
