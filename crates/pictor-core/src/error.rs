//! Error types module
//!
//! `AppError` is the error type of the metadata store and of request handling. Media-host
//! failures have their own type in `pictor-storage`.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::deadline::DeadlineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Client mistakes.
    Debug,
    /// Transient conditions the caller can retry through.
    Warn,
    Error,
}

/// How an error is rendered to HTTP clients and to the log.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code clients can match on, e.g. `DATABASE_ERROR`.
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same request may succeed.
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show to clients.
    fn client_message(&self) -> String;

    /// Sensitive errors never expose their details, whatever the environment.
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Call interrupted: {0}")]
    Interrupted(#[from] DeadlineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => Presentation {
                status: 500,
                code: "DATABASE_ERROR",
                recoverable: true,
                action: Some("Retry after a short delay"),
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::InvalidInput(_) => Presentation {
                status: 400,
                code: "INVALID_INPUT",
                recoverable: false,
                action: Some("Send a title and an image"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::PayloadTooLarge(_) => Presentation {
                status: 413,
                code: "PAYLOAD_TOO_LARGE",
                recoverable: false,
                action: Some("Reduce the image size and try again"),
                sensitive: false,
                level: LogLevel::Debug,
            },
            AppError::Interrupted(DeadlineError::Elapsed(_)) => Presentation {
                status: 504,
                code: "DEADLINE_EXCEEDED",
                recoverable: true,
                action: Some("Retry the request"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::Interrupted(DeadlineError::Cancelled) => Presentation {
                status: 503,
                code: "CANCELLED",
                recoverable: true,
                action: Some("The server is shutting down, retry shortly"),
                sensitive: false,
                level: LogLevel::Warn,
            },
            AppError::Internal(_) => Presentation {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: false,
                action: None,
                sensitive: true,
                level: LogLevel::Error,
            },
        }
    }

    /// Variant name, recorded as `error_type` in logs and non-production responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Interrupted(_) => "Interrupted",
            AppError::Internal(_) => "Internal",
        }
    }

    /// The message followed by every source in the chain.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }
}
