//! # hub-config
//!
//! Layered configuration loading for the hub context using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HUBCTX_*` prefix, `__` as separator)
//! 2. Project-level `.hubctx/config.toml`
//! 3. User-level `~/.config/hubctx/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HUBCTX_PORTAL__URL` -> `portal.url`, `HUBCTX_LOGGING__LEVEL` -> `logging.level`.
//!
//! # Usage
//!
//! ```no_run
//! use hub_config::ContextConfig;
//!
//! let config = ContextConfig::load_with_dotenv().expect("config");
//! println!("organization: {}", config.portal.url);
//! ```

mod error;
mod logging;
mod portal;

pub use error::ConfigError;
pub use logging::{LogLevel, LoggingConfig};
pub use portal::PortalConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use hub_core::{FeatureFlags, ResourceConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Applications to exchange the primary token for once signed in.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
    /// Flag overrides applied before user settings are folded in.
    #[serde(default)]
    pub features: FeatureFlags,
}

impl ContextConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".hubctx/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("HUBCTX_").split("__"))
    }

    /// Reject values that would only fail later, at sign-in time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed portal URL or resource entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.portal.url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "portal.url".into(),
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
        for (idx, resource) in self.resources.iter().enumerate() {
            resource.validate().map_err(|e| ConfigError::InvalidValue {
                field: format!("resources[{idx}]"),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hubctx").join("config.toml"))
    }
}
