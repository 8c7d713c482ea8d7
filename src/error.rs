use crate::domain::validation::FieldErrors;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Invalid data: {0}")]
    ValidationError(FieldErrors),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("Payment gateway error: {0}")]
    GatewayError(String),
    #[error("Payment gateway did not answer within {0:?}")]
    GatewayTimeout(Duration),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl PulseError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        Self::ValidationError(errors)
    }

    /// Gateway failures are worth retrying from the client side; nothing else is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::GatewayError(_) | Self::GatewayTimeout(_))
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        Self::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;
