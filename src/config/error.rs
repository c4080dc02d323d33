pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required configuration value is missing: {0}")]
    MissingValue(&'static str),
    #[error("configuration value '{key}' is invalid: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("figment error: {0}")]
    Figment(#[from] figment::Error),
}
