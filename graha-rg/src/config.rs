//! Configuration resolution for graha-rg
//!
//! **[RG-CFG-010]** ENV > TOML priority for provider credentials, with a
//! warning when both sources carry a value. Validation happens once at
//! startup: a service without provider credentials cannot produce reports.

use graha_common::config::{resolve_setting, TomlConfig};
use graha_common::{Error, Result};
use std::path::PathBuf;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5731;

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub provider_url: String,
    pub provider_user_id: String,
    pub provider_api_key: String,
    pub assets_dir: PathBuf,
}

/// Resolve service settings from environment and TOML config
pub fn resolve(toml: &TomlConfig) -> Result<ServiceConfig> {
    let provider_url = resolve_setting("GRAHA_PROVIDER_URL", toml.provider_url.as_deref(), None)
        .ok_or_else(|| missing("provider URL", "GRAHA_PROVIDER_URL", "provider_url"))?;

    let provider_user_id = resolve_setting(
        "GRAHA_PROVIDER_USER_ID",
        toml.provider_user_id.as_deref(),
        None,
    )
    .ok_or_else(|| missing("provider user id", "GRAHA_PROVIDER_USER_ID", "provider_user_id"))?;

    let provider_api_key = resolve_setting(
        "GRAHA_PROVIDER_API_KEY",
        toml.provider_api_key.as_deref(),
        None,
    )
    .ok_or_else(|| missing("provider API key", "GRAHA_PROVIDER_API_KEY", "provider_api_key"))?;

    let assets_dir = resolve_setting(
        "GRAHA_ASSETS_DIR",
        toml.assets_dir.as_deref(),
        Some("assets"),
    )
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from("assets"));

    Ok(ServiceConfig {
        provider_url,
        provider_user_id,
        provider_api_key,
        assets_dir,
    })
}

fn missing(what: &str, env_var: &str, toml_key: &str) -> Error {
    Error::Config(format!(
        "{} not configured. Set one of:\n\
         1. Environment: {}=...\n\
         2. TOML config: ~/.config/graha/graha-rg.toml ({} = \"...\")",
        what, env_var, toml_key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_toml() {
        let toml = TomlConfig {
            provider_url: Some("https://api.example.com/v1".to_string()),
            provider_user_id: Some("607123".to_string()),
            provider_api_key: Some("secret".to_string()),
            assets_dir: Some("/srv/graha/assets".to_string()),
        };
        let config = resolve(&toml).unwrap();
        assert_eq!(config.provider_url, "https://api.example.com/v1");
        assert_eq!(config.assets_dir, PathBuf::from("/srv/graha/assets"));
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let toml = TomlConfig {
            provider_url: Some("https://api.example.com/v1".to_string()),
            ..Default::default()
        };
        let err = resolve(&toml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_assets_dir_defaults() {
        let toml = TomlConfig {
            provider_url: Some("u".to_string()),
            provider_user_id: Some("i".to_string()),
            provider_api_key: Some("k".to_string()),
            assets_dir: None,
        };
        let config = resolve(&toml).unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }
}
