//! Configuration directory and persistent settings

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::args::RuleSetFormat;

/// Get the configuration directory for soundshift
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine configuration directory")?;
    Ok(base.join("soundshift"))
}

/// Get the default config file path
fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Get the config file path with optional override
pub fn config_file_path_with_override(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Get file extension for a rule-set format
pub fn file_extension(format: RuleSetFormat) -> &'static str {
    match format {
        RuleSetFormat::Text => "sc",
        RuleSetFormat::Json => "json",
    }
}

/// Validate that a config file path has .json extension
pub fn validate_config_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "Config file must have .json extension, got .{}",
            ext
        )),
        None => Err(anyhow::anyhow!("Config file must have .json extension")),
    }
}

/// User configuration stored in config file
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersistentConfig {
    /// Default rule-set file
    pub rules_path: Option<PathBuf>,
    /// Print the input word next to each output
    pub show_input: Option<bool>,
    /// Print every intermediate form
    pub trace: Option<bool>,
}

impl PersistentConfig {
    /// Load configuration from the default location or `custom_path`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self> {
        let path = config_file_path_with_override(custom_path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default location or `custom_path`
    pub fn save_to(&self, custom_path: Option<&Path>) -> Result<()> {
        let path = config_file_path_with_override(custom_path)?;
        validate_config_path(&path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Merge with command-line options (CLI options take precedence)
    pub fn merge_with_cli(&self, cli: &PersistentConfig) -> Self {
        Self {
            rules_path: cli.rules_path.clone().or_else(|| self.rules_path.clone()),
            show_input: cli.show_input.or(self.show_input),
            trace: cli.trace.or(self.trace),
        }
    }
}
