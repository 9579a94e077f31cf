//! History errors.

use crate::host::HostError;
use thiserror::Error;

/// Errors surfaced by history mutations that do not fall back.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("host rejected history mutation: {0}")]
    Host(#[from] HostError),

    #[error("state could not be converted to a structured value: {0}")]
    State(#[from] serde_json::Error),
}

/// Errors that can occur when building a history.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Navigation host not specified. Call .host(host) before .build()")]
    MissingHost,
}
