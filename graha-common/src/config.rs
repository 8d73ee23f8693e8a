//! Configuration loading for GRAHA services
//!
//! **[COM-CFG-010]** TOML config file with CLI > ENV > TOML > default priority.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/graha/graha-rg.toml`)
///
/// All fields are optional; the service applies its own defaults and
/// environment overrides on top of whatever the file provides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the computation provider API
    pub provider_url: Option<String>,
    /// Provider account user id
    pub provider_user_id: Option<String>,
    /// Provider API key
    pub provider_api_key: Option<String>,
    /// Directory holding static report assets (logo, cover art)
    pub assets_dir: Option<String>,
}

/// Get the configuration file path for the platform
///
/// Linux: `~/.config/graha/<service>.toml`, falling back to
/// `/etc/graha/<service>.toml` when the user file does not exist.
pub fn config_file_path(service: &str) -> Option<PathBuf> {
    let file_name = format!("{}.toml", service);

    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("graha").join(&file_name);
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/graha").join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load the service config, preferring an explicit path over platform lookup
///
/// A missing file is not an error (all settings have env/default fallbacks);
/// a present-but-malformed file is.
pub fn load_service_config(service: &str, explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => config_file_path(service),
    };

    match path {
        Some(p) if p.exists() => {
            tracing::info!("Loading config from {}", p.display());
            load_toml_config(&p)
        }
        Some(p) => Err(Error::Config(format!("Config file not found: {}", p.display()))),
        None => Ok(TomlConfig::default()),
    }
}

/// Resolve a single string setting with ENV > TOML > default priority
///
/// **[COM-CFG-020]** When both sources carry a value a warning is logged and
/// the environment wins (matches the resolution order used across services).
pub fn resolve_setting(
    env_var: &str,
    toml_value: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| !v.trim().is_empty());
    let toml_value = toml_value.filter(|v| !v.trim().is_empty());

    if env_value.is_some() && toml_value.is_some() {
        tracing::warn!(
            "{} set in both environment and TOML config; using environment",
            env_var
        );
    }

    env_value
        .or_else(|| toml_value.map(|v| v.to_string()))
        .or_else(|| default.map(|v| v.to_string()))
}
