use thiserror::Error;

/// Main error type for query translation
#[derive(Error, Debug)]
pub enum HepQueryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid value for filter '{name}': {reason}")]
    InvalidFilterValue { name: String, reason: String },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for query translation
pub type Result<T> = std::result::Result<T, HepQueryError>;

impl HepQueryError {
    /// Check if this error was caused by the request rather than the deployment
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HepQueryError::UnknownFilter(_) | HepQueryError::InvalidFilterValue { .. }
        )
    }
}
