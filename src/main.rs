use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cpp_enum_codegen::config::ConfigFile;
use cpp_enum_codegen::{Pipeline, RunOptions};

#[derive(Parser)]
#[command(name = "cpp-enum-codegen")]
#[command(about = "Generate string and JSON converters for annotated C++ enums")]
#[command(version)]
struct Cli {
    /// Root of the C++ project to scan
    #[arg(long, alias = "project_dir")]
    project_dir: Option<PathBuf>,

    /// Include directory of the project, relative to the project dir (repeatable)
    #[arg(long = "project-include-dir", alias = "project_include_dir")]
    project_include_dirs: Vec<PathBuf>,

    /// Where generated headers are written
    #[arg(long, alias = "output_include_dir")]
    output_include_dir: Option<PathBuf>,

    /// Where generated sources are written
    #[arg(long, alias = "output_source_dir")]
    output_source_dir: Option<PathBuf>,

    /// Namespace of generated helpers, dot separated (e.g. `my.gen`)
    #[arg(long)]
    namespace: Option<String>,

    /// Glob of paths to skip (repeatable)
    #[arg(long = "ignore-path-glob", alias = "ignore_path_glob")]
    ignore_path_globs: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress bars
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            project_dir: self.project_dir.clone(),
            project_include_dirs: self.project_include_dirs.clone(),
            output_include_dir: self.output_include_dir.clone(),
            output_source_dir: self.output_source_dir.clone(),
            namespace: self.namespace.clone(),
            ignore_path_globs: self.ignore_path_globs.clone(),
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME")))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base = match &cli.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => ConfigFile::default(),
    };
    let settings = base
        .merge(cli.overrides())
        .into_settings()
        .context("Invalid configuration")?;

    info!(
        "cpp-enum-codegen v{}: scanning {}",
        env!("CARGO_PKG_VERSION"),
        settings.project_dir.display()
    );

    let stats = Pipeline::new(settings).run(&RunOptions {
        show_progress: !cli.no_progress,
    })?;

    if stats.files_written == 0 {
        info!("No changes, skipping all writes");
    }

    Ok(())
}
