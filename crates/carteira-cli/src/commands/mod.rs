//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod config;
pub mod detect;
pub mod process;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use carteira_core::CarteiraConfig;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carteira")
        .join("config.json")
}

/// Resolve the configuration file: the `--config` path when given, the user
/// configuration file otherwise.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; a missing user file
/// falls back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CarteiraConfig> {
    if let Some(path) = config_path {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(CarteiraConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(CarteiraConfig::from_file(&path)?)
    } else {
        Ok(CarteiraConfig::default())
    }
}

/// Read an OCR text file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(text)
}
