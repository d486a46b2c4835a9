//! Result and error types for the core library

use serde::Serialize;
use thiserror::Error;

/// Core library error type
///
/// Each variant maps onto one [`ErrorKind`]; the transport layer only ever
/// looks at the kind and the display message.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    InsufficientFunds(String),

    #[error("Too many failed login attempts. Please try again in {wait_minutes} minutes")]
    LockedOut { wait_minutes: i64 },

    #[error("{0}")]
    OperationFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error taxonomy shared with the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationFailed,
    NotFound,
    InvalidCredentials,
    Duplicate,
    InsufficientFunds,
    LockedOut,
    OperationFailed,
    Internal,
}

impl ErrorKind {
    /// Stable code string used in response bodies
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::Duplicate => "DUPLICATE",
            ErrorKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorKind::LockedOut => "LOCKED_OUT",
            ErrorKind::OperationFailed => "OPERATION_FAILED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::InvalidCredentials(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::InsufficientFunds(msg.into())
    }

    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::ValidationFailed,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            Error::Duplicate(_) => ErrorKind::Duplicate,
            Error::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            Error::LockedOut { .. } => ErrorKind::LockedOut,
            Error::OperationFailed(_) => ErrorKind::OperationFailed,
            Error::Database(_) | Error::Config(_) => ErrorKind::Internal,
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(Error::validation("x").kind().code(), "VALIDATION_FAILED");
        assert_eq!(Error::duplicate("x").kind(), ErrorKind::Duplicate);
        assert_eq!(Error::database("boom").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_locked_out_message() {
        let err = Error::LockedOut { wait_minutes: 12 };
        assert_eq!(err.kind(), ErrorKind::LockedOut);
        assert_eq!(
            err.to_string(),
            "Too many failed login attempts. Please try again in 12 minutes"
        );
    }

    #[test]
    fn test_kind_serializes_as_code() {
        let json = serde_json::to_string(&ErrorKind::InsufficientFunds).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_FUNDS\"");
    }
}
