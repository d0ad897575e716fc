//! Canonical card model shared by every catalog

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The card catalogs a search can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Catalog A: pokemontcg-style records with a TCGplayer price block
    PokemonTcg,
    /// Catalog B: tcgdex-style records with a Cardmarket price block
    Tcgdex,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::PokemonTcg, Source::Tcgdex];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::PokemonTcg => "pokemon_tcg",
            Source::Tcgdex => "tcgdex",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices reported by one catalog for one card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBlock {
    pub currency: String,
    #[serde(default)]
    pub market: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl PriceBlock {
    /// True if at least one price is present
    pub fn has_values(&self) -> bool {
        self.market.is_some() || self.low.is_some() || self.high.is_some()
    }
}

/// Price payload of a candidate, one optional block per catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPrices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_tcg: Option<PriceBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcgdex: Option<PriceBlock>,
}

impl CardPrices {
    /// Build a payload holding only the given catalog's block
    pub fn from_block(source: Source, block: PriceBlock) -> Self {
        let mut prices = Self::default();
        match source {
            Source::PokemonTcg => prices.pokemon_tcg = Some(block),
            Source::Tcgdex => prices.tcgdex = Some(block),
        }
        prices
    }

    pub fn get(&self, source: Source) -> Option<&PriceBlock> {
        match source {
            Source::PokemonTcg => self.pokemon_tcg.as_ref(),
            Source::Tcgdex => self.tcgdex.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Source::ALL
            .iter()
            .all(|source| self.get(*source).map_or(true, |block| !block.has_values()))
    }
}

/// One normalized card record.
///
/// Text fields use the empty string for "unknown". `sources` records every
/// catalog that contributed to this candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardCandidate {
    pub name: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prices: CardPrices,
    #[serde(default)]
    pub sources: BTreeSet<Source>,
    #[serde(default)]
    pub external_ids: BTreeMap<Source, String>,
}

impl CardCandidate {
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn has_price(&self) -> bool {
        !self.prices.is_empty()
    }

    /// Catalog-specific id, used for detail lookups after a card is picked
    pub fn external_id(&self, source: Source) -> Option<&str> {
        self.external_ids.get(&source).map(String::as_str)
    }
}
