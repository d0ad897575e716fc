//! Additive relevance scoring and stable ranking

use crate::query::{normalize_query, ParsedQuery};
use tcg_common::CardCandidate;

// Name-match tiers, only the highest applicable one counts
const EXACT_NAME: u32 = 100;
const NAME_PREFIX: u32 = 50;
const NAME_CONTAINS: u32 = 30;
const ALL_WORDS_IN_NAME: u32 = 20;

// Bonuses, stacked on top of the tier
const PRIMARY_NAME_PREFIX: u32 = 15;
const PRIMARY_NAME_CONTAINS: u32 = 10;
const NUMBER_EXACT: u32 = 15;
const NUMBER_CONTAINS: u32 = 5;
const CARD_TYPE_MATCH: u32 = 10;
const WORD_IN_SET: u32 = 8;
const HAS_IMAGE: u32 = 5;
const HAS_PRICE: u32 = 2;

/// Candidate paired with its score and its position before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: CardCandidate,
    pub score: u32,
    position: usize,
}

impl ScoredCandidate {
    /// Position of the candidate in the list handed to [`rank`]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Relevance of `candidate` for `query`; `parsed` must come from the same query.
pub fn score(candidate: &CardCandidate, query: &str, parsed: &ParsedQuery) -> u32 {
    let full_query = normalize_query(query);
    let name = candidate.name.to_lowercase();
    let words: Vec<&str> = full_query.split(' ').filter(|w| !w.is_empty()).collect();

    let mut total = name_tier(&name, &full_query, &words);

    if !parsed.primary_name.is_empty() {
        if name.starts_with(&parsed.primary_name) {
            total += PRIMARY_NAME_PREFIX;
        } else if name.contains(&parsed.primary_name) {
            total += PRIMARY_NAME_CONTAINS;
        }
    }

    if let Some(wanted) = parsed.first_number() {
        let number = candidate.number.to_lowercase();
        if number == wanted {
            total += NUMBER_EXACT;
        } else if number.contains(wanted) {
            total += NUMBER_CONTAINS;
        }
    }

    if parsed
        .card_type_tokens
        .iter()
        .any(|token| name.contains(token.as_str()))
    {
        total += CARD_TYPE_MATCH;
    }

    let set_name = candidate.set_name.to_lowercase();
    if !set_name.is_empty() && words.iter().any(|word| set_name.contains(word)) {
        total += WORD_IN_SET;
    }

    if candidate.has_image() {
        total += HAS_IMAGE;
    }
    if candidate.has_price() {
        total += HAS_PRICE;
    }

    total
}

fn name_tier(name: &str, full_query: &str, words: &[&str]) -> u32 {
    if full_query.is_empty() {
        0
    } else if name == full_query {
        EXACT_NAME
    } else if name.starts_with(full_query) {
        NAME_PREFIX
    } else if name.contains(full_query) {
        NAME_CONTAINS
    } else if words.iter().all(|word| name.contains(word)) {
        ALL_WORDS_IN_NAME
    } else {
        0
    }
}

/// Score and sort descending. Equal scores keep their incoming order.
pub fn rank(candidates: Vec<CardCandidate>, query: &str, parsed: &ParsedQuery) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| ScoredCandidate {
            score: score(&candidate, query, parsed),
            candidate,
            position,
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
    scored
}

/// [`rank`] without the scores
pub fn rank_candidates(
    candidates: Vec<CardCandidate>,
    query: &str,
    parsed: &ParsedQuery,
) -> Vec<CardCandidate> {
    rank(candidates, query, parsed)
        .into_iter()
        .map(|scored| scored.candidate)
        .collect()
}
