use std::num::ParseIntError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    ParseError(String, ParseIntError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upload discarded")]
    Discarded,

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Text suitable for an alert or an inline form message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. }
            | AppError::Validation(message)
            | AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Conflict(message)
            | AppError::Forbidden(message) => message.clone(),
            AppError::Unauthorized => "Please log in to continue.".to_string(),
            AppError::Discarded => "Upload discarded.".to_string(),
            AppError::Network(_)
            | AppError::Decode(_)
            | AppError::Io(_)
            | AppError::Config(_) => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Conflict(_)
        )
    }
}
