//! The configuration structs used to build the AppConfig, and their impls.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult, API_KEY_ENV, LIST_ID_ENV};

// ###################################
// ->   STRUCTS
// ###################################
/// Which inbound transport this process serves.
#[derive(AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServeMode {
    /// A standing HTTP listener.
    #[default]
    Server,
    /// Single-shot invocations dispatched by API Gateway to a Lambda function.
    Gateway,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net: NetConfig,
    pub sendgrid: SendgridConfig,
    pub redirect: RedirectConfig,
    pub queue: QueueConfig,
    #[serde(skip)]
    pub mode: ServeMode,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SendgridConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub list_id: String,
    pub timeout_millis: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RedirectConfig {
    pub success_page: String,
    pub error_page: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    pub capacity: usize,
}

// ###################################
// ->   IMPLs
// ###################################
impl ServeMode {
    /// Only the exact value `TRUE` selects gateway mode.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("TRUE") => ServeMode::Gateway,
            _ => ServeMode::Server,
        }
    }
}

impl SendgridConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl AppConfig {
    /// Checks the values serde can't: required strings must not be blank,
    /// URLs must parse and the deletion queue needs room for at least one job.
    pub(super) fn validate(&self) -> ConfigResult<()> {
        if self.sendgrid.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingValue(API_KEY_ENV));
        }
        if self.sendgrid.list_id.trim().is_empty() {
            return Err(ConfigError::MissingValue(LIST_ID_ENV));
        }

        let urls = [
            ("sendgrid.base_url", &self.sendgrid.base_url),
            ("redirect.success_page", &self.redirect.success_page),
            ("redirect.error_page", &self.redirect.error_page),
        ];
        for (key, url) in urls {
            reqwest::Url::parse(url).map_err(|er| ConfigError::InvalidValue {
                key,
                reason: er.to_string(),
            })?;
        }

        if self.queue.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "queue.capacity",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
