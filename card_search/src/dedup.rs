//! Cross-catalog identity and field-level merging of duplicate candidates
//!
//! Two records describe the same physical card when their [`DedupKey`]s match.
//! The key is built from normalized name, collector number and set name, so it
//! does not depend on which catalog produced the record.

use std::collections::HashMap;
use std::fmt;
use tcg_common::{CardCandidate, CardPrices};

/// Marketing prefixes one catalog puts in set names and the other does not
/// (e.g. "Pokemon Base Set" vs "Base Set"). Longest first.
const SERIES_PHRASES: &[&str] = &[
    "pokemon trading card game",
    "pokémon trading card game",
    "trading card game",
    "pokemon tcg",
    "pokémon tcg",
    "pokemon",
    "pokémon",
    "tcg",
];

/// Identity string `name::number::set`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn of(candidate: &CardCandidate) -> Self {
        Self(format!(
            "{}::{}::{}",
            normalize_text(&candidate.name),
            normalize_number(&candidate.number),
            normalize_set_name(&candidate.set_name)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase, drop punctuation, collapse whitespace
pub fn normalize_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() {
                Some(' ')
            } else {
                None
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collector number without the "/set size" suffix or leading zeros ("004/102" -> "4")
pub fn normalize_number(number: &str) -> String {
    let head = number.split('/').next().unwrap_or_default();
    let normalized = normalize_text(head).replace(' ', "");
    let trimmed = normalized.trim_start_matches('0');
    if trimmed.is_empty() && !normalized.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// [`normalize_text`] plus removal of series phrases. A set name made only of
/// series words is kept as is.
pub fn normalize_set_name(set_name: &str) -> String {
    let normalized = normalize_text(set_name);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let phrases: Vec<Vec<&str>> = SERIES_PHRASES
        .iter()
        .map(|phrase| phrase.split(' ').collect())
        .collect();

    let mut kept = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let matched = phrases
            .iter()
            .find(|phrase| tokens[i..].starts_with(phrase.as_slice()));
        match matched {
            Some(phrase) => i += phrase.len(),
            None => {
                kept.push(tokens[i]);
                i += 1;
            }
        }
    }

    if kept.is_empty() {
        normalized
    } else {
        kept.join(" ")
    }
}

fn first_non_empty(seed: String, other: String) -> String {
    if seed.trim().is_empty() {
        other
    } else {
        seed
    }
}

/// Merge two candidates sharing a key. `seed` is the one seen first and wins
/// every field it has; price blocks merge per catalog and sources are unioned.
pub fn merge_candidates(seed: CardCandidate, other: CardCandidate) -> CardCandidate {
    let mut sources = seed.sources;
    sources.extend(other.sources);

    let mut external_ids = other.external_ids;
    external_ids.extend(seed.external_ids);

    let image_url = seed
        .image_url
        .filter(|url| !url.trim().is_empty())
        .or(other.image_url);

    let prices = CardPrices {
        pokemon_tcg: seed
            .prices
            .pokemon_tcg
            .filter(|block| block.has_values())
            .or(other.prices.pokemon_tcg),
        tcgdex: seed
            .prices
            .tcgdex
            .filter(|block| block.has_values())
            .or(other.prices.tcgdex),
    };

    CardCandidate {
        name: first_non_empty(seed.name, other.name),
        set_name: first_non_empty(seed.set_name, other.set_name),
        number: first_non_empty(seed.number, other.number),
        rarity: first_non_empty(seed.rarity, other.rarity),
        image_url,
        prices,
        sources,
        external_ids,
    }
}

/// Collapse candidates with equal keys, keeping first-seen order.
/// Running it on its own output changes nothing.
pub fn dedup(candidates: Vec<CardCandidate>) -> Vec<CardCandidate> {
    let before = candidates.len();
    let mut slots: Vec<CardCandidate> = Vec::with_capacity(before);
    let mut index: HashMap<DedupKey, usize> = HashMap::with_capacity(before);

    for candidate in candidates {
        let key = DedupKey::of(&candidate);
        match index.get(&key) {
            Some(&slot) => {
                let seed = std::mem::take(&mut slots[slot]);
                slots[slot] = merge_candidates(seed, candidate);
            }
            None => {
                index.insert(key, slots.len());
                slots.push(candidate);
            }
        }
    }

    if slots.len() != before {
        log::debug!("Dedup merged {} candidates into {}", before, slots.len());
    }
    slots
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
