//! # Configuration
//!
//! Optional YAML file (`--config`) with defaults for the schema directory,
//! citation style and output format. Command-line flags always win over the
//! file, and the file wins over built-in defaults.
//!
//! ```yaml
//! schema_dir: ./schemas
//! citation_style: apa
//! format: markdown
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use mesa_core::CitationStyle;

/// How a single node is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
    Markdown,
}

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub schema_dir: Option<PathBuf>,
    pub citation_style: Option<CitationStyle>,
    pub format: Option<OutputFormat>,
}

impl CliConfig {
    /// Parse a config file. Relative `schema_dir` is taken relative to the
    /// file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: CliConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(dir) = config.schema_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.schema_dir = Some(if dir.is_absolute() { dir } else { base.join(dir) });
        }
        Ok(config)
    }
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` when no directory was given and none was found by walking up.
    pub schema_dir: Option<PathBuf>,
    pub citation_style: CitationStyle,
    pub format: OutputFormat,
}

impl Settings {
    /// Merge `--schema-dir` and the optional config file. Falls back to the
    /// nearest `schemas/` directory above `cwd`.
    pub fn resolve(
        config_path: Option<&Path>,
        schema_dir_flag: Option<&Path>,
        cwd: &Path,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let schema_dir = schema_dir_flag
            .map(Path::to_path_buf)
            .or(config.schema_dir)
            .or_else(|| find_schema_dir(cwd));

        Ok(Self {
            schema_dir,
            citation_style: config.citation_style.unwrap_or_default(),
            format: config.format.unwrap_or_default(),
        })
    }
}

/// Walk up from `start` to the first ancestor containing `schemas/`.
pub fn find_schema_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("schemas"))
        .find(|candidate| candidate.is_dir())
}
