//! Error types for `gatewayctl`

use thiserror::Error;

/// Process-level error type for `gatewayctl` operations
#[derive(Error, Debug)]
pub enum GatewayCtlError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connectivity or migration error
    #[error("Database error: {0}")]
    Database(String),

    /// Logging, tracing or metrics setup error
    #[error("Observability error: {0}")]
    Observability(String),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GatewayCtlError>;

/// Application codes carried in the `code` field of every API response.
///
/// Zero is success. Values below 1000 mirror HTTP semantics; the 1000xx
/// range is namespaced per subsystem (`1000xx` database, `1001xx` gateway).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    BadRequest,
    NotFound,
    InternalServerError,
    Database,
    CreateRoute,
    GatewayRequest,
}

impl ErrorCode {
    pub const fn code(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::BadRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::InternalServerError => 500,
            ErrorCode::Database => 100_001,
            ErrorCode::CreateRoute => 100_101,
            ErrorCode::GatewayRequest => 100_102,
        }
    }

    /// Message used when no more specific diagnostic is available.
    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorCode::Success => "ok",
            ErrorCode::BadRequest => "Bad Request",
            ErrorCode::NotFound => "Not Found",
            ErrorCode::InternalServerError => "Internal Server Error",
            ErrorCode::Database => "Database Error",
            ErrorCode::CreateRoute => "Gateway Route Error",
            ErrorCode::GatewayRequest => "Gateway Request Rejected",
        }
    }
}
