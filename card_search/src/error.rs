//! Error types for card_search

/// Failure while loading or saving the result cache snapshot
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for cache persistence
pub type Result<T> = std::result::Result<T, CacheError>;
