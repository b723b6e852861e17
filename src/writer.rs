use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CodegenError;
use crate::generators::enums::model::FileInfo;

/// Subdirectory of both output roots holding the generated pairs.
const CONVERTERS_DIR: &str = "converters";

/// A rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Where generated headers and sources go.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub include_dir: PathBuf,
    pub source_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(include_dir: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            include_dir: include_dir.into(),
            source_dir: source_dir.into(),
        }
    }

    pub fn header_path(&self, name: &str) -> PathBuf {
        self.include_dir.join(CONVERTERS_DIR).join(format!("{name}.hpp"))
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.source_dir.join(CONVERTERS_DIR).join(format!("{name}.cpp"))
    }

    /// Directories holding nothing but generated files.
    pub fn converter_dirs(&self) -> [PathBuf; 2] {
        [
            self.include_dir.join(CONVERTERS_DIR),
            self.source_dir.join(CONVERTERS_DIR),
        ]
    }

    /// How a generated source includes its header.
    pub fn header_include(&self, name: &str) -> String {
        format!("{CONVERTERS_DIR}/{name}.hpp")
    }
}

/// Path of the declaring file as the project includes it, e.g. `gfx/color.hpp`.
///
/// The deepest include root containing the file wins.
pub fn canonical_include_path(file_info: &FileInfo) -> Result<String, CodegenError> {
    file_info
        .include_roots
        .iter()
        .filter(|root| file_info.path.starts_with(root))
        .max_by_key(|root| root.components().count())
        .and_then(|root| file_info.path.strip_prefix(root).ok())
        .map(|relative| {
            relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .ok_or_else(|| CodegenError::NoIncludeRootMatch {
            path: file_info.path.clone(),
        })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: usize,
    pub unchanged: usize,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CodegenError + '_ {
    move |source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write every file, creating parent directories. Files already holding the
/// same bytes are left untouched.
pub fn write_files(files: &[GeneratedFile]) -> Result<WriteOutcome, CodegenError> {
    let mut outcome = WriteOutcome::default();

    for file in files {
        let should_write = match fs::read(&file.path) {
            Ok(existing) => existing != file.contents.as_bytes(),
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => return Err(io_error(&file.path)(err)),
        };

        if !should_write {
            debug!(path = %file.path.display(), "No changes");
            outcome.unchanged += 1;
            continue;
        }

        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&file.path, &file.contents).map_err(io_error(&file.path))?;
        info!(path = %file.path.display(), "Written");
        outcome.written += 1;
    }

    Ok(outcome)
}
