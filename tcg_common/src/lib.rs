//! Shared types for trading card catalog lookups
//!
//! Both card catalogs are consumed through the same JSON envelope but return
//! differently shaped records. This crate holds the canonical card model, the
//! per-catalog record shapes and the errors a catalog request can produce.

pub mod error;
pub mod models;
pub mod records;

pub use error::{ProviderError, Result};
pub use models::{CardCandidate, CardPrices, PriceBlock, Source};
pub use records::{
    normalize_results, CardNumber, Envelope, PokemonTcgRecord, RawRecord, TcgdexRecord,
};
