//! Hard pass/reject gate applied before ranking

use crate::query::ParsedQuery;
use tcg_common::CardCandidate;

/// Names this short or shorter are too ambiguous to filter on
const MIN_FILTERED_NAME_LEN: usize = 2;

/// Every applicable condition must hold; there is no partial credit.
pub fn passes_filter(candidate: &CardCandidate, query: &ParsedQuery) -> bool {
    let name = candidate.name.to_lowercase();

    if query.primary_name.chars().count() > MIN_FILTERED_NAME_LEN
        && !name.contains(&query.primary_name)
    {
        return false;
    }

    if !query.card_type_tokens.is_empty()
        && !query
            .card_type_tokens
            .iter()
            .any(|token| name.contains(token.as_str()))
    {
        return false;
    }

    if let Some(number) = query.first_number() {
        if !candidate.number.to_lowercase().contains(number) {
            return false;
        }
    }

    true
}

/// Drop candidates that fail [`passes_filter`], keeping the order of the rest
pub fn filter_candidates(candidates: Vec<CardCandidate>, query: &ParsedQuery) -> Vec<CardCandidate> {
    let before = candidates.len();
    let kept: Vec<_> = candidates
        .into_iter()
        .filter(|candidate| passes_filter(candidate, query))
        .collect();
    log::debug!("Relevance filter kept {} of {} candidates", kept.len(), before);
    kept
}
