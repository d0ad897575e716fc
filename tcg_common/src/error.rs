//! Error types for catalog requests

use crate::models::Source;
use std::time::Duration;

/// Failure of a single catalog request.
///
/// None of these ever reach a search caller; the aggregator degrades every
/// variant to "no results from this catalog".
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (connection refused, DNS, reset...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Catalog answered with a non-2xx status
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Response body was not a valid envelope
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Envelope came back with `success: false`
    #[error("{0} reported an unsuccessful search")]
    Unsuccessful(Source),
    /// Catalog did not answer within its deadline
    #[error("{0} timed out after {1:?}")]
    Timeout(Source, Duration),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(..))
    }
}

/// Result alias for catalog requests
pub type Result<T> = std::result::Result<T, ProviderError>;
