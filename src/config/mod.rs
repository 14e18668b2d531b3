mod types;

pub use types::*;

use anyhow::{Context, Result};
use segcat_core::SafeMode;
use std::path::Path;

/// Load configuration from a TOML file, logging any validation warnings
pub fn load_config(path: &Path) -> Result<Config> {
    let config = read_config(path)?;
    for warning in validate_config(&config)? {
        tracing::warn!("{}", warning);
    }

    Ok(config)
}

/// Parse a TOML config file without validating it
pub fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./segcat.toml", "~/.config/segcat/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration, returning warnings for settings that are legal
/// but probably not intended.
pub fn validate_config(config: &Config) -> Result<Vec<String>> {
    if config.concat.timeout_us == Some(0) {
        anyhow::bail!("concat.timeout_us cannot be 0");
    }

    let mut warnings = Vec::new();
    if config.concat.safe == SafeMode::Disabled {
        warnings.push("Safe mode is disabled: scripts may reference any path or URL".to_string());
    }
    if let Some(filter) = &config.logging.filter {
        if filter.trim().is_empty() {
            warnings.push("logging.filter is empty and will be ignored".to_string());
        }
    }

    Ok(warnings)
}
