use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

/// Settings as written in a TOML file or given on the command line, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub project_dir: Option<PathBuf>,
    /// Relative entries are relative to `project_dir`.
    #[serde(default)]
    pub project_include_dirs: Vec<PathBuf>,
    pub output_include_dir: Option<PathBuf>,
    pub output_source_dir: Option<PathBuf>,
    /// Dot separated, e.g. `my.gen`.
    pub namespace: Option<String>,
    #[serde(default)]
    pub ignore_path_globs: Vec<String>,
}

/// Validated settings of one run. Every path is absolute.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub project_include_dirs: Vec<PathBuf>,
    pub output_include_dir: PathBuf,
    pub output_source_dir: PathBuf,
    pub namespace: Vec<String>,
    pub ignore_path_globs: Vec<String>,
}

impl ConfigFile {
    /// Read a TOML file. Relative paths in it resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.rebase(base))
    }

    fn rebase(mut self, base: &Path) -> Self {
        let rebase = |path: Option<PathBuf>| {
            path.map(|p| if p.is_relative() { base.join(p) } else { p })
        };
        self.project_dir = rebase(self.project_dir);
        self.output_include_dir = rebase(self.output_include_dir);
        self.output_source_dir = rebase(self.output_source_dir);
        self
    }

    /// Values set in `overrides` win; lists are replaced, not appended.
    pub fn merge(self, overrides: ConfigFile) -> Self {
        fn pick<T>(base: Vec<T>, overrides: Vec<T>) -> Vec<T> {
            if overrides.is_empty() {
                base
            } else {
                overrides
            }
        }

        Self {
            project_dir: overrides.project_dir.or(self.project_dir),
            project_include_dirs: pick(self.project_include_dirs, overrides.project_include_dirs),
            output_include_dir: overrides.output_include_dir.or(self.output_include_dir),
            output_source_dir: overrides.output_source_dir.or(self.output_source_dir),
            namespace: overrides.namespace.or(self.namespace),
            ignore_path_globs: pick(self.ignore_path_globs, overrides.ignore_path_globs),
        }
    }

    pub fn into_settings(self) -> Result<Settings> {
        let project_dir = self
            .project_dir
            .context("Missing required setting `project_dir`")?;
        let project_dir = project_dir
            .canonicalize()
            .with_context(|| format!("Project directory {} does not exist", project_dir.display()))?;
        if !project_dir.is_dir() {
            bail!("Project path {} is not a directory", project_dir.display());
        }

        if self.project_include_dirs.is_empty() {
            bail!("Missing required setting `project_include_dirs`");
        }
        let project_include_dirs = self
            .project_include_dirs
            .iter()
            .map(|dir| {
                let resolved = project_dir.join(dir);
                resolved
                    .canonicalize()
                    .with_context(|| format!("Include directory {} does not exist", resolved.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let output_include_dir = absolute(
            self.output_include_dir
                .context("Missing required setting `output_include_dir`")?,
        )?;
        let output_source_dir = absolute(
            self.output_source_dir
                .context("Missing required setting `output_source_dir`")?,
        )?;

        let namespace = parse_namespace(
            &self.namespace.context("Missing required setting `namespace`")?,
        )?;

        Ok(Settings {
            project_dir,
            project_include_dirs,
            output_include_dir,
            output_source_dir,
            namespace,
            ignore_path_globs: self.ignore_path_globs,
        })
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    std::path::absolute(&path).with_context(|| format!("Invalid path {}", path.display()))
}

/// `my.gen` -> `["my", "gen"]`, every segment a C++ identifier.
pub fn parse_namespace(namespace: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = namespace.split('.').map(str::to_string).collect();
    if let Some(bad) = segments.iter().find(|segment| !IDENTIFIER_RE.is_match(segment)) {
        bail!("Invalid namespace `{namespace}`: `{bad}` is not a C++ identifier");
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_basic() {
        let toml_str = r#"
project_dir = "."
project_include_dirs = ["include", "third_party/include"]
output_include_dir = "generated/include"
output_source_dir = "generated/src"
namespace = "my.gen"
ignore_path_globs = ["**/build/**"]
"#;
        let config: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(config.project_dir, Some(PathBuf::from(".")));
        assert_eq!(config.project_include_dirs.len(), 2);
        assert_eq!(config.namespace.as_deref(), Some("my.gen"));
        assert_eq!(config.ignore_path_globs, vec!["**/build/**"]);
    }

    #[test]
    fn test_parse_config_empty() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.project_dir.is_none());
        assert!(config.project_include_dirs.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("clang_library = \"libclang.so\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("codegen.toml");
        fs::write(
            &config_path,
            r#"
project_dir = "project"
project_include_dirs = ["include"]
output_include_dir = "/abs/include"
output_source_dir = "out/src"
"#,
        )
        .unwrap();

        let config = ConfigFile::load(&config_path).unwrap();
        assert_eq!(config.project_dir, Some(dir.path().join("project")));
        assert_eq!(config.project_include_dirs, vec![PathBuf::from("include")]);
        assert_eq!(config.output_include_dir, Some(PathBuf::from("/abs/include")));
        assert_eq!(config.output_source_dir, Some(dir.path().join("out/src")));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = ConfigFile {
            project_dir: Some(PathBuf::from("/base")),
            project_include_dirs: vec![PathBuf::from("include")],
            namespace: Some("base".to_string()),
            ignore_path_globs: vec!["a/**".to_string()],
            ..Default::default()
        };
        let overrides = ConfigFile {
            namespace: Some("cli.ns".to_string()),
            project_include_dirs: vec![PathBuf::from("src")],
            ..Default::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.project_dir, Some(PathBuf::from("/base")));
        assert_eq!(merged.project_include_dirs, vec![PathBuf::from("src")]);
        assert_eq!(merged.namespace.as_deref(), Some("cli.ns"));
        assert_eq!(merged.ignore_path_globs, vec!["a/**"]);
    }

    #[test]
    fn test_into_settings() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("include")).unwrap();

        let settings = ConfigFile {
            project_dir: Some(dir.path().to_path_buf()),
            project_include_dirs: vec![PathBuf::from("include")],
            output_include_dir: Some(dir.path().join("out/include")),
            output_source_dir: Some(dir.path().join("out/src")),
            namespace: Some("my.gen".to_string()),
            ignore_path_globs: Vec::new(),
        }
        .into_settings()
        .unwrap();

        let project_dir = dir.path().canonicalize().unwrap();
        assert_eq!(settings.project_dir, project_dir);
        assert_eq!(settings.project_include_dirs, vec![project_dir.join("include")]);
        assert_eq!(settings.namespace, vec!["my", "gen"]);
    }

    #[test]
    fn test_missing_settings() {
        let err = ConfigFile::default().into_settings().unwrap_err();
        assert!(err.to_string().contains("project_dir"));

        let dir = TempDir::new().unwrap();
        let err = ConfigFile {
            project_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        }
        .into_settings()
        .unwrap_err();
        assert!(err.to_string().contains("project_include_dirs"));
    }

    #[test]
    fn test_missing_include_dir() {
        let dir = TempDir::new().unwrap();
        let result = ConfigFile {
            project_dir: Some(dir.path().to_path_buf()),
            project_include_dirs: vec![PathBuf::from("missing")],
            output_include_dir: Some(dir.path().join("out")),
            output_source_dir: Some(dir.path().join("out")),
            namespace: Some("gen".to_string()),
            ignore_path_globs: Vec::new(),
        }
        .into_settings();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_namespace() {
        assert_eq!(parse_namespace("gen").unwrap(), vec!["gen"]);
        assert_eq!(parse_namespace("my._detail2").unwrap(), vec!["my", "_detail2"]);
        assert!(parse_namespace("").is_err());
        assert!(parse_namespace("my..gen").is_err());
        assert!(parse_namespace("my.2gen").is_err());
        assert!(parse_namespace("my::gen").is_err());
    }
}
