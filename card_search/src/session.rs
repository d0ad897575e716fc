//! Search sessions: newer searches supersede older in-flight ones
//!
//! A search box fires a search per (debounced) keystroke. Each search gets a
//! token from the session; when it finishes, its results are only committed
//! if no newer token was issued meanwhile. The network requests of a
//! superseded search still run to completion, their output is just ignored.

use crate::aggregator::{Aggregator, SearchOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tcg_common::CardCandidate;

/// Issues search tokens for one search box
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    latest: Arc<AtomicU64>,
}

/// Identifies one search invocation within its session
#[derive(Debug, Clone)]
pub struct SearchToken {
    id: u64,
    latest: Arc<AtomicU64>,
}

/// Result of a search run through a session
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Completed(Vec<CardCandidate>),
    /// A newer search was started before this one finished
    Superseded,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, superseding every earlier token
    pub fn begin(&self) -> SearchToken {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SearchToken {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    pub async fn search(
        &self,
        aggregator: &Aggregator,
        query: &str,
        options: SearchOptions,
    ) -> SearchOutcome {
        let token = self.begin();
        aggregator.search_with_token(query, options, &token).await
    }
}

impl SearchToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once a newer search has begun in the same session
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}

impl SearchOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }

    /// Results, or nothing for a superseded search
    pub fn into_results(self) -> Vec<CardCandidate> {
        match self {
            SearchOutcome::Completed(results) => results,
            SearchOutcome::Superseded => Vec::new(),
        }
    }
}
