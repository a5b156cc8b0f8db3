//! Common error types for the lineup crates

use thiserror::Error;

/// Common result type for lineup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the lineup crates
#[derive(Error, Debug)]
pub enum Error {
    /// TOML configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
