//! Raw catalog records and their normalization into [`CardCandidate`]
//!
//! Each catalog answers with `{"success": bool, "results": [...]}` but the
//! records inside have a catalog-specific shape. Records are parsed one by one
//! so a single malformed entry never spoils the rest of the response.

use crate::models::{CardCandidate, CardPrices, PriceBlock, Source};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Response envelope shared by both catalogs
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Collector number as sent by the catalogs (string or bare integer)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CardNumber {
    Text(String),
    Integer(u64),
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardNumber::Text(text) => f.write_str(text.trim()),
            CardNumber::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Catalog A record
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonTcgRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<CardNumber>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub set: Option<PokemonTcgSet>,
    #[serde(default)]
    pub images: Option<PokemonTcgImages>,
    #[serde(default)]
    pub tcgplayer: Option<TcgplayerBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonTcgSet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonTcgImages {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgplayerBlock {
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Keyed by printing variant ("normal", "holofoil", ...)
    #[serde(default)]
    pub prices: BTreeMap<String, VariantPrices>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantPrices {
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub mid: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub market: Option<f64>,
}

/// Variants checked first when picking the TCGplayer price line
const PREFERRED_VARIANTS: &[&str] = &["normal", "holofoil", "reverseHolofoil", "1stEditionHolofoil"];

/// Catalog B record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgdexRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub local_id: Option<CardNumber>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub set: Option<TcgdexSet>,
    /// Asset base URL; the image itself lives at `<image>/high.webp`
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub pricing: Option<TcgdexPricing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TcgdexSet {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TcgdexPricing {
    #[serde(default)]
    pub cardmarket: Option<CardmarketPrices>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardmarketPrices {
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub trend: Option<f64>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A record tagged with the catalog it came from
#[derive(Debug, Clone)]
pub enum RawRecord {
    PokemonTcg(PokemonTcgRecord),
    Tcgdex(TcgdexRecord),
}

impl RawRecord {
    /// Parse one entry of a catalog's `results` list.
    ///
    /// Returns `None` for shapes that do not fit the catalog's record type.
    pub fn from_value(source: Source, value: serde_json::Value) -> Option<Self> {
        let parsed = match source {
            Source::PokemonTcg => serde_json::from_value(value).map(RawRecord::PokemonTcg),
            Source::Tcgdex => serde_json::from_value(value).map(RawRecord::Tcgdex),
        };
        match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Dropping unrecognized {} record: {}", source, e);
                None
            }
        }
    }

    pub fn source(&self) -> Source {
        match self {
            RawRecord::PokemonTcg(_) => Source::PokemonTcg,
            RawRecord::Tcgdex(_) => Source::Tcgdex,
        }
    }

    /// Convert into the canonical candidate. Records without a usable name are dropped.
    pub fn normalize(self) -> Option<CardCandidate> {
        let source = self.source();
        let candidate = match self {
            RawRecord::PokemonTcg(record) => normalize_pokemon_tcg(record),
            RawRecord::Tcgdex(record) => normalize_tcgdex(record),
        };
        if candidate.is_none() {
            log::debug!("Dropping {} record without a name", source);
        }
        candidate
    }
}

/// Parse and normalize a whole `results` list, skipping malformed entries
pub fn normalize_results(source: Source, results: Vec<serde_json::Value>) -> Vec<CardCandidate> {
    results
        .into_iter()
        .filter_map(|value| RawRecord::from_value(source, value))
        .filter_map(RawRecord::normalize)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn seed_candidate(source: Source, name: String, id: Option<String>) -> CardCandidate {
    let mut candidate = CardCandidate {
        name,
        ..Default::default()
    };
    candidate.sources.insert(source);
    if let Some(id) = non_empty(id) {
        candidate.external_ids.insert(source, id);
    }
    candidate
}

fn normalize_pokemon_tcg(record: PokemonTcgRecord) -> Option<CardCandidate> {
    let name = non_empty(record.name)?;
    let mut candidate = seed_candidate(Source::PokemonTcg, name, record.id);

    candidate.number = record.number.map(|n| n.to_string()).unwrap_or_default();
    candidate.rarity = non_empty(record.rarity).unwrap_or_default();
    candidate.set_name = record
        .set
        .and_then(|set| non_empty(set.name))
        .unwrap_or_default();
    candidate.image_url = record
        .images
        .and_then(|images| non_empty(images.large).or(non_empty(images.small)));

    if let Some(block) = record.tcgplayer.and_then(tcgplayer_price_block) {
        candidate.prices = CardPrices::from_block(Source::PokemonTcg, block);
    }

    Some(candidate)
}

/// Pick one printing variant's prices: preferred variants first, then any variant with values
fn tcgplayer_price_block(tcgplayer: TcgplayerBlock) -> Option<PriceBlock> {
    let TcgplayerBlock { updated_at, prices } = tcgplayer;

    let to_block = |variant: &VariantPrices| PriceBlock {
        currency: "USD".to_string(),
        market: variant.market.or(variant.mid),
        low: variant.low,
        high: variant.high,
        updated_at: updated_at.clone(),
    };

    PREFERRED_VARIANTS
        .iter()
        .filter_map(|name| prices.get(*name))
        .chain(prices.values())
        .map(to_block)
        .find(PriceBlock::has_values)
}

fn normalize_tcgdex(record: TcgdexRecord) -> Option<CardCandidate> {
    let name = non_empty(record.name)?;
    let mut candidate = seed_candidate(Source::Tcgdex, name, record.id);

    candidate.number = record
        .local_id
        .map(|n| n.to_string())
        .unwrap_or_default();
    candidate.rarity = non_empty(record.rarity).unwrap_or_default();
    candidate.set_name = record
        .set
        .and_then(|set| non_empty(set.name))
        .unwrap_or_default();
    candidate.image_url =
        non_empty(record.image).map(|base| format!("{}/high.webp", base.trim_end_matches('/')));

    if let Some(cardmarket) = record.pricing.and_then(|p| p.cardmarket) {
        let block = PriceBlock {
            currency: non_empty(cardmarket.unit).unwrap_or_else(|| "EUR".to_string()),
            market: cardmarket.trend.or(cardmarket.avg),
            low: cardmarket.low,
            high: None,
            updated_at: cardmarket.updated,
        };
        if block.has_values() {
            candidate.prices = CardPrices::from_block(Source::Tcgdex, block);
        }
    }

    Some(candidate)
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
