use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::ast::{CppParser, TranslationUnit};
use crate::config::Settings;
use crate::error::CodegenError;
use crate::generators::enums::conversions::ConversionRegistry;
use crate::generators::{EnumGenerator, GeneratedFile, Generator};
use crate::scanner::{scan_project, IgnoreFilter};
use crate::selector::select;
use crate::writer::{write_files, OutputLayout, WriteOutcome};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// Counters of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub files_scanned: usize,
    pub files_parsed: usize,
    /// Marked declarations handed to generators.
    pub units_processed: usize,
    /// Declarations that produced output.
    pub declarations_generated: usize,
    pub files_written: usize,
    pub files_unchanged: usize,
}

/// Scan, parse, select, generate, write.
pub struct Pipeline {
    settings: Settings,
    generators: Vec<Box<dyn Generator>>,
}

impl Pipeline {
    /// Pipeline with the built-in generators.
    pub fn new(settings: Settings) -> Self {
        let enums = EnumGenerator::new(
            ConversionRegistry::with_defaults(),
            OutputLayout::new(&settings.output_include_dir, &settings.output_source_dir),
            settings.project_include_dirs.clone(),
            settings.namespace.clone(),
        );
        Self::with_generators(settings, vec![Box::new(enums)])
    }

    pub fn with_generators(settings: Settings, generators: Vec<Box<dyn Generator>>) -> Self {
        Self {
            settings,
            generators,
        }
    }

    pub fn run(&self, options: &RunOptions) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::default();

        let layout = OutputLayout::new(&self.settings.output_include_dir, &self.settings.output_source_dir);
        let filter = layout
            .converter_dirs()
            .into_iter()
            .fold(IgnoreFilter::new(&self.settings.ignore_path_globs)?, IgnoreFilter::exclude_dir);
        let files = scan_project(&self.settings.project_dir, &filter)?;
        stats.files_scanned = files.len();
        info!("Scanned {} C++ files", files.len());

        let units = self.parse_all(&files, options)?;
        stats.files_parsed = units.len();

        let progress = create_progress_bar(units.len(), "Generating", options.show_progress);
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut generated = Vec::new();
        for tu in &units {
            if let Some(name) = tu.path.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }

            generated.extend(self.generate_unit(tu, &mut claimed, &mut stats)?);
            progress.inc(1);
        }
        progress.finish_and_clear();

        // Nothing reaches the disk unless every unit generated cleanly
        let outcome: WriteOutcome = write_files(&generated).context("Failed to write generated files")?;
        stats.files_written = outcome.written;
        stats.files_unchanged = outcome.unchanged;

        info!(
            "Generated {} of {} marked declarations: {} files written, {} unchanged in {:.2}s",
            stats.declarations_generated,
            stats.units_processed,
            stats.files_written,
            stats.files_unchanged,
            start.elapsed().as_secs_f64()
        );

        Ok(stats)
    }

    /// Parse every file in parallel; the result keeps the input order.
    fn parse_all(&self, files: &[PathBuf], options: &RunOptions) -> Result<Vec<TranslationUnit>> {
        let progress = create_progress_bar(files.len(), "Parsing to AST", options.show_progress);

        let units = files
            .par_iter()
            .map(|path| -> Result<TranslationUnit> {
                // tree-sitter parsers are not shared across threads
                let mut parser = CppParser::new()?;
                let tu = parser
                    .parse_file(path)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                progress.inc(1);
                Ok(tu)
            })
            .collect::<Result<Vec<_>>>()?;

        progress.finish_and_clear();
        Ok(units)
    }

    /// Render everything one translation unit produces.
    fn generate_unit(
        &self,
        tu: &TranslationUnit,
        claimed: &mut HashSet<PathBuf>,
        stats: &mut RunStats,
    ) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();

        for unit in select(tu, &self.generators) {
            stats.units_processed += 1;
            debug!(
                file = %tu.path.display(),
                name = %unit.decl.spelling,
                line = unit.decl.line,
                "Selected declaration"
            );

            let mut produced = false;
            for generator in &unit.generators {
                let generated = generator.generate(&unit, tu).with_context(|| {
                    format!(
                        "{} generator failed in {}",
                        generator.name(),
                        tu.path.display()
                    )
                })?;

                for file in generated {
                    if !claimed.insert(file.path.clone()) {
                        return Err(CodegenError::OutputCollision { path: file.path }.into());
                    }
                    produced = true;
                    files.push(file);
                }
            }

            if produced {
                stats.declarations_generated += 1;
            }
        }

        Ok(files)
    }
}

fn create_progress_bar(total: usize, title: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_prefix(title);
    pb
}
