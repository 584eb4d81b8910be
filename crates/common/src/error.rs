//! Error types for fixtures and configuration

use thiserror::Error;

/// Result type alias using the common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown fixture: {kind} '{name}'")]
    UnknownFixture { kind: String, name: String },
}

impl Error {
    pub(crate) fn unknown(kind: &str, name: &str) -> Self {
        Error::UnknownFixture {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}
