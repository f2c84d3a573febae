use thiserror::Error;

/// Errors that can occur while talking to the recipe backend or handling forms
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure (connection, timeout, body decoding)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error payload
    #[error("{message}")]
    Service { code: u16, message: String },

    /// No active session, or the session is not allowed to do this
    #[error("Not signed in")]
    Unauthorized,

    /// The requested record does not exist
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// The service answered with something we could not understand
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A form or action argument was rejected before reaching the service
    #[error("{0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),
}
