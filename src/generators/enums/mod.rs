pub mod config;
pub mod conversions;
pub mod model;
mod templates;

use std::path::PathBuf;

use tracing::{debug, warn};

use self::config::enabled_conversions;
use self::conversions::{ConversionRegistry, ConversionResult};
use self::model::{EnumDeclaration, FileInfo, GenerationConfig};
use super::Generator;
use crate::ast::{Decl, DeclKind, ScopeSegment, TranslationUnit};
use crate::error::CodegenError;
use crate::selector::SelectedDecl;
use crate::writer::{canonical_include_path, GeneratedFile, OutputLayout};

/// Emits one header/source pair per annotated enum.
pub struct EnumGenerator {
    registry: ConversionRegistry,
    layout: OutputLayout,
    include_roots: Vec<PathBuf>,
    namespace: Vec<String>,
}

impl EnumGenerator {
    pub fn new(
        registry: ConversionRegistry,
        layout: OutputLayout,
        include_roots: Vec<PathBuf>,
        namespace: Vec<String>,
    ) -> Self {
        Self {
            registry,
            layout,
            include_roots,
            namespace,
        }
    }
}

impl Generator for EnumGenerator {
    fn name(&self) -> &str {
        "enum"
    }

    fn need_to_generate(&self, decl: &Decl) -> bool {
        decl.kind == DeclKind::Enum
    }

    fn generate(
        &self,
        unit: &SelectedDecl<'_>,
        tu: &TranslationUnit,
    ) -> Result<Vec<GeneratedFile>, CodegenError> {
        let decl = unit.decl;
        if decl.is_anonymous() {
            warn!(file = %tu.path.display(), line = decl.line, "Skipping anonymous enum");
            return Ok(Vec::new());
        }

        if unit
            .scope
            .iter()
            .any(|segment| matches!(segment, ScopeSegment::TemplateRecord(_)))
        {
            warn!(
                file = %tu.path.display(),
                line = decl.line,
                name = %decl.spelling,
                "Skipping enum nested in a class template"
            );
            return Ok(Vec::new());
        }

        let enabled = decl
            .raw_comment
            .as_deref()
            .map(enabled_conversions)
            .unwrap_or_default();
        if enabled.is_empty() {
            debug!(file = %tu.path.display(), name = %decl.spelling, "No conversions enabled");
            return Ok(Vec::new());
        }

        let enum_decl = EnumDeclaration::from_decl(decl, &unit.scope)?;
        let config = GenerationConfig {
            enabled,
            namespace: self.namespace.clone(),
        };
        let conversions = self.registry.resolve(&config, &enum_decl.qualified())?;

        let file_info = FileInfo {
            path: tu.path.clone(),
            include_roots: self.include_roots.clone(),
        };
        let include_path = canonical_include_path(&file_info)?;

        let results: Vec<ConversionResult> = conversions
            .iter()
            .map(|conversion| {
                let values = enum_decl.literals_for(conversion.value_postfix());
                conversion.convert(&values, &enum_decl, &file_info, &config)
            })
            .collect();

        let name = enum_decl.local_name();
        debug!(
            name = %enum_decl.qualified(),
            line = enum_decl.line,
            conversions = results.len(),
            "Generating enum converters"
        );

        Ok(vec![
            GeneratedFile {
                path: self.layout.header_path(name),
                contents: templates::render_header(&include_path, &results),
            },
            GeneratedFile {
                path: self.layout.source_path(name),
                contents: templates::render_source(
                    &self.layout.header_include(name),
                    &include_path,
                    &results,
                ),
            },
        ])
    }
}
