use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::annotation::{parse_annotations, SchemeLiterals};
use crate::ast::{Decl, ScopeSegment};
use crate::comment::{strip_comment, CommentStyle};
use crate::error::CodegenError;

/// An annotated C++ enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    /// Outermost namespace or class first, the enum itself last.
    pub qualified_name: Vec<String>,
    /// The namespace segments of `qualified_name`.
    pub namespace: Vec<String>,
    pub values: Vec<EnumValue>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    /// `Outer::Enum::VALUE`
    pub reference: String,
    pub literals: SchemeLiterals,
}

/// One entry of the value -> literal mapping handed to a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueLiteral {
    pub reference: String,
    pub literal: String,
}

/// Conversions enabled for one enum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    pub enabled: BTreeSet<String>,
    /// Namespace for generated helpers that cannot live next to the enum.
    pub namespace: Vec<String>,
}

/// Where the enum was declared and how the project includes it.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub include_roots: Vec<PathBuf>,
}

impl EnumDeclaration {
    /// Build from a selected enum node, parsing each value's annotations.
    pub fn from_decl(decl: &Decl, scope: &[ScopeSegment]) -> Result<Self, CodegenError> {
        let mut qualified_name: Vec<String> =
            scope.iter().map(|segment| segment.name().to_string()).collect();
        qualified_name.push(decl.spelling.clone());

        let namespace = scope
            .iter()
            .filter_map(|segment| match segment {
                ScopeSegment::Namespace(name) => Some(name.clone()),
                ScopeSegment::Record(_) | ScopeSegment::TemplateRecord(_) => None,
            })
            .collect();

        let enum_name = qualified_name.join("::");
        let values = decl
            .children
            .iter()
            .map(|value| {
                let lines = value
                    .raw_comment
                    .as_deref()
                    .map(|raw| strip_comment(raw, CommentStyle::Trailing))
                    .unwrap_or_default();
                let literals =
                    parse_annotations(lines.as_slice()).map_err(|source| CodegenError::Annotation {
                        enum_name: enum_name.clone(),
                        value: value.spelling.clone(),
                        line: value.line,
                        source,
                    })?;

                Ok(EnumValue {
                    name: value.spelling.clone(),
                    reference: format!("{}::{}", enum_name, value.spelling),
                    literals,
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        Ok(Self {
            qualified_name,
            namespace,
            values,
            line: decl.line,
        })
    }

    pub fn local_name(&self) -> &str {
        self.qualified_name.last().map(String::as_str).unwrap_or_default()
    }

    /// `A::B::Enum`
    pub fn qualified(&self) -> String {
        self.qualified_name.join("::")
    }

    /// Value -> literal mapping for one scheme postfix, in declaration order.
    pub fn literals_for(&self, postfix: &str) -> Vec<ValueLiteral> {
        self.values
            .iter()
            .map(|value| ValueLiteral {
                reference: value.reference.clone(),
                literal: value.literal_for(postfix).to_string(),
            })
            .collect()
    }
}

impl EnumValue {
    /// The annotated literal for `postfix`, or the value's own spelling.
    pub fn literal_for(&self, postfix: &str) -> &str {
        self.literals
            .get(postfix)
            .map(String::as_str)
            .unwrap_or(self.name.as_str())
    }
}
