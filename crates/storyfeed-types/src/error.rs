use thiserror::Error;

/// Errors produced when interpreting domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("timestamp out of range: {0}ms")]
    TimestampOutOfRange(i64),
}
