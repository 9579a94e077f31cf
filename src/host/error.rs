//! Host error types.

use thiserror::Error;

/// Errors a navigation host can raise when asked to mutate its stack.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HostError {
    /// The host caps the number of history mutations (iOS allows 100)
    #[error("history mutation limit ({limit}) exceeded")]
    QuotaExceeded { limit: usize },

    /// The state payload could not be stored
    #[error("state of {size} bytes exceeds the host limit of {limit} bytes")]
    DataClone { size: usize, limit: usize },

    /// The target URL is not same-origin with the current document
    #[error("cannot navigate the history stack to cross-origin URL '{url}'")]
    Security { url: String },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Any other failure reported by the underlying platform
    #[error("platform error: {0}")]
    Platform(String),
}
