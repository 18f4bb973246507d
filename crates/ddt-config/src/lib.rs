//! # ddt-config
//!
//! Layered configuration loading for ddt using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DDT_*` prefix, `__` as separator)
//! 2. An explicit TOML file passed by the caller (`--config`)
//! 3. Project-level `.ddt/config.toml`
//! 4. User-level `~/.config/ddt/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `DDT_GENERATE__INDENTATION` -> `generate.indentation`,
//! `DDT_PARSE__METHOD_NAMES_TO_IGNORE` -> `parse.method_names_to_ignore`.
//!
//! # Usage
//!
//! ```no_run
//! use ddt_config::DdtConfig;
//!
//! let config = DdtConfig::load_with_dotenv().expect("config");
//! println!("indent: {:?}", config.generate.indent(1));
//! ```

mod error;
mod generate;
mod parse;

pub use error::ConfigError;
pub use generate::{GenerateSettings, NullabilityMode};
pub use parse::ParseSettings;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DDT_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DdtConfig {
    #[serde(default)]
    pub generate: GenerateSettings,
    #[serde(default)]
    pub parse: ParseSettings,
}

impl DdtConfig {
    /// Load configuration from the TOML files and environment variables.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Figment`] when a source cannot be read or
    /// deserialized, [`ConfigError::InvalidValue`] when a value is rejected.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment(None))
    }

    /// [`Self::load`] with an additional TOML file above the project config.
    ///
    /// # Errors
    /// As [`Self::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::figment(Some(path)))
    }

    /// Load `.env` from the current directory first, then [`Self::load`].
    ///
    /// # Errors
    /// As [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load `.env` from the current directory first, then [`Self::load_from`].
    ///
    /// # Errors
    /// As [`Self::load`].
    pub fn load_from_with_dotenv(path: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from(path)
    }

    /// Build the figment provider chain.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".ddt/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.generate.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ddt").join("config.toml"))
    }
}
