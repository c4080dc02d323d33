//! Builds an `AppConfig` from layered sources, lowest priority first:
//! the compiled-in `config/base.toml`, an optional TOML file, the SendGrid
//! credentials from the environment and finally `LISTOMAT_*` overrides.
//!
//! The config is built once in `main` and handed to the app by value.

mod error;
mod types;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, NetConfig, QueueConfig, RedirectConfig, SendgridConfig, ServeMode};

pub const API_KEY_ENV: &str = "SENDGRID_API_KEY";
pub const LIST_ID_ENV: &str = "SENDGRID_LIST_ID";
pub const RUN_AS_LAMBDA_ENV: &str = "RUN_AS_LAMBDA";
pub const CONFIG_FILE_ENV: &str = "LISTOMAT_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config/listomat.toml";
const BASE_CONFIG: &str = include_str!("../../config/base.toml");

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Fails if the SendGrid API key or list id is missing.
    pub fn load() -> ConfigResult<Self> {
        info!("{:<12} - Loading the configuration", "load_config");

        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut figment = base_figment().merge(Toml::file(config_file));

        // Env values are kept as plain strings, a numeric list id must not become an integer.
        for (var, key) in [
            (API_KEY_ENV, "sendgrid.api_key"),
            (LIST_ID_ENV, "sendgrid.list_id"),
        ] {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        let figment = figment.merge(Env::prefixed("LISTOMAT_").split("__"));
        let mode = ServeMode::from_flag(std::env::var(RUN_AS_LAMBDA_ENV).ok().as_deref());

        Self::from_figment(&figment, mode)
    }

    /// Extracts and validates an `AppConfig` from any `Figment`.
    pub fn from_figment(figment: &Figment, mode: ServeMode) -> ConfigResult<Self> {
        for (key, var) in [
            ("sendgrid.api_key", API_KEY_ENV),
            ("sendgrid.list_id", LIST_ID_ENV),
        ] {
            if figment.find_value(key).is_err() {
                return Err(ConfigError::MissingValue(var));
            }
        }

        let mut config: AppConfig = figment.extract()?;
        config.validate()?;
        config.mode = mode;

        Ok(config)
    }
}

/// The compiled-in defaults every other source is merged over.
pub fn base_figment() -> Figment {
    Figment::from(Toml::string(BASE_CONFIG))
}
