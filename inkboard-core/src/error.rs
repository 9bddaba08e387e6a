//! Error types for inkboard operations

use crate::SourceKind;
use thiserror::Error;

/// Configuration errors.
///
/// Raised while building [`crate::TickerConfig`] at startup. A config error
/// for one source disables that source for the run; it is fatal only when
/// the rotation ends up empty.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown source in screen order: {name}")]
    UnknownSource { name: String },

    #[error("No enabled screens to rotate")]
    EmptyRotation,
}

/// Fetch errors from upstream data APIs.
///
/// A single attempt per call; recovery (stale cache fallback or a
/// placeholder screen) is the caller's concern, so these never reach the
/// display driver.
// The field is `kind`, not `source`: thiserror reserves `source` for the
// wrapped std error, and these are leaf errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{kind}: upstream unreachable: {reason}")]
    Unreachable { kind: SourceKind, reason: String },

    #[error("{kind}: request failed with status {status}: {message}")]
    RequestFailed {
        kind: SourceKind,
        status: u16,
        message: String,
    },

    #[error("{kind}: invalid payload: {reason}")]
    InvalidPayload { kind: SourceKind, reason: String },
}

/// Master error type for all inkboard errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TickerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(String),
}

/// Result type alias for inkboard operations.
pub type TickerResult<T> = Result<T, TickerError>;

// =============================================================================
// TESTS
// =============================================================================
