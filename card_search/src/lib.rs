//! Card Search - hybrid search over two trading card catalogs
//!
//! Queries both catalogs in parallel, reconciles their overlapping records
//! into one deduplicated list, ranks it against the free-text query and
//! serves repeated queries from a TTL-bounded cache.

pub mod aggregator;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dedup;
pub mod error;
pub mod query;
pub mod relevance;
pub mod session;
pub mod web;

pub use aggregator::{Aggregator, SearchOptions};
pub use cache::{canonical_key, CacheEntry, CacheLookup, SearchCache};
pub use config::{ProviderConfig, SearchConfig};
pub use dedup::DedupKey;
pub use error::{CacheError, Result};
pub use query::ParsedQuery;
pub use session::{SearchOutcome, SearchSession, SearchToken};
pub use tcg_common::{CardCandidate, CardPrices, PriceBlock, Source};
