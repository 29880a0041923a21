//! Error types for warm-up and configuration

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

/// A contact repository could not supply a user's contacts
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("no contacts stored for user '{0}'")]
    UserNotFound(String),

    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("warm-up failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    /// Short stable code, handy for log fields and CLI exit reporting
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::Repository(RepositoryError::UserNotFound(_)) => "USER_NOT_FOUND",
            LookupError::Repository(_) => "REPOSITORY_ERROR",
            LookupError::Config(_) | LookupError::ConfigFile(_) => "CONFIG_ERROR",
            LookupError::Io(_) => "IO_ERROR",
        }
    }
}
