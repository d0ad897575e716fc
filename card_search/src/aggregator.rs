//! Hybrid search across both card catalogs
//!
//! One search runs: cache check -> concurrent fetch from both catalogs (each
//! with its own deadline) -> position-weighted merge -> filter -> dedup ->
//! rank -> truncate -> cache write. Catalog failures degrade to an empty
//! branch; `search` itself never fails.

use crate::cache::{canonical_key, CacheLookup, SearchCache};
use crate::catalog::CatalogClient;
use crate::config::SearchConfig;
use crate::dedup::{dedup, merge_candidates, DedupKey};
use crate::query::ParsedQuery;
use crate::relevance::{filter_candidates, rank_candidates};
use crate::session::{SearchOutcome, SearchToken};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tcg_common::{CardCandidate, Source};
use tokio::sync::RwLock;

/// Per-call search options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Look the query up in the cache first. Fresh results are written either way.
    pub use_cache: bool,
    /// Serve a stale cache entry instead of refetching
    pub allow_expired: bool,
    /// Falls back to the configured default
    pub max_results: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            allow_expired: false,
            max_results: None,
        }
    }
}

/// Fans a query out to both catalogs and owns the result cache
pub struct Aggregator {
    config: SearchConfig,
    pokemon_tcg: CatalogClient,
    tcgdex: CatalogClient,
    cache: Arc<RwLock<SearchCache>>,
}

impl Aggregator {
    pub fn new(config: SearchConfig) -> Self {
        let cache = SearchCache::new(config.cache_ttl(), config.cache_capacity);
        Self::with_cache(config, Arc::new(RwLock::new(cache)))
    }

    /// Use an existing (e.g. loaded from disk, or shared) cache
    pub fn with_cache(config: SearchConfig, cache: Arc<RwLock<SearchCache>>) -> Self {
        log::info!("Creating card search aggregator (logic {})", config.logic_version);
        let client = reqwest::Client::new();
        Self {
            pokemon_tcg: CatalogClient::with_client(
                Source::PokemonTcg,
                config.provider(Source::PokemonTcg),
                client.clone(),
            ),
            tcgdex: CatalogClient::with_client(Source::Tcgdex, config.provider(Source::Tcgdex), client),
            config,
            cache,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<RwLock<SearchCache>> {
        &self.cache
    }

    /// Search both catalogs. Returns at most `max_results` candidates ordered
    /// by descending relevance; every failure degrades to fewer results.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Vec<CardCandidate> {
        self.run(query, options, None).await.into_results()
    }

    /// Like [`search`](Self::search), but results are discarded (and not
    /// cached) if `token` was superseded while the catalogs were queried.
    pub async fn search_with_token(
        &self,
        query: &str,
        options: SearchOptions,
        token: &SearchToken,
    ) -> SearchOutcome {
        self.run(query, options, Some(token)).await
    }

    async fn run(&self, query: &str, options: SearchOptions, token: Option<&SearchToken>) -> SearchOutcome {
        let max_results = options.max_results.unwrap_or(self.config.default_max_results);
        if query.trim().is_empty() || max_results == 0 {
            return SearchOutcome::Completed(Vec::new());
        }

        let key = canonical_key(&self.config.logic_version, query);

        if options.use_cache {
            let lookup = self.cache.read().await.lookup(&key, max_results, Utc::now());
            match lookup {
                CacheLookup::Fresh(results) => {
                    log::debug!("Cache hit for '{}'", key);
                    return SearchOutcome::Completed(truncate(results, max_results));
                }
                CacheLookup::Stale(results) if options.allow_expired => {
                    log::info!("Serving expired cache entry for '{}'", key);
                    return SearchOutcome::Completed(truncate(results, max_results));
                }
                CacheLookup::Stale(_) => log::debug!("Cache entry for '{}' is stale, refetching", key),
                CacheLookup::Miss => log::debug!("Cache miss for '{}'", key),
            }
        }

        log::info!("Searching catalogs for '{}'", query.trim());
        let parsed = ParsedQuery::parse(query);
        let provider_query = parsed.catalog_query(query);

        // Wait for both branches; merge order must not depend on which finishes first
        let (pokemon_tcg, tcgdex) = tokio::join!(
            self.fetch_branch(&self.pokemon_tcg, &provider_query),
            self.fetch_branch(&self.tcgdex, &provider_query),
        );

        let merged = weighted_merge(
            vec![(Source::PokemonTcg, pokemon_tcg), (Source::Tcgdex, tcgdex)],
            self.config.provider_limit,
        );
        let results = run_pipeline(merged, query, &parsed, max_results);

        if let Some(token) = token {
            if !token.is_current() {
                log::debug!("Search '{}' superseded, discarding {} results", query.trim(), results.len());
                return SearchOutcome::Superseded;
            }
        }

        if self.cache.write().await.insert(key, results.clone(), max_results, Utc::now()) {
            log::info!("Cached {} results for '{}'", results.len(), query.trim());
        }
        log::info!("Search '{}' returned {} results", query.trim(), results.len());
        SearchOutcome::Completed(results)
    }

    async fn fetch_branch(&self, client: &CatalogClient, query: &str) -> Vec<CardCandidate> {
        match client.search_with_timeout(query, self.config.provider_limit).await {
            Ok(candidates) => candidates,
            Err(e) if e.is_timeout() => {
                log::warn!("{}", e);
                Vec::new()
            }
            Err(e) => {
                log::warn!("{} unavailable: {}", client.source(), e);
                Vec::new()
            }
        }
    }
}

/// Filter -> dedup -> rank -> truncate
pub fn run_pipeline(
    candidates: Vec<CardCandidate>,
    query: &str,
    parsed: &ParsedQuery,
    max_results: usize,
) -> Vec<CardCandidate> {
    let filtered = filter_candidates(candidates, parsed);
    let unique = dedup(filtered);
    let ranked = rank_candidates(unique, query, parsed);
    truncate(ranked, max_results)
}

struct Weighted {
    candidate: CardCandidate,
    weight: usize,
    weighed_by: BTreeSet<Source>,
    first_seen: usize,
}

/// Merge per-catalog result lists into one list ordered by positional weight.
///
/// A record at position `i` of its catalog's list weighs `depth - i` (at
/// least 1). Records sharing a [`DedupKey`] are merged. Each catalog adds
/// weight to a key once, at its best position, so cards both catalogs agree
/// on move up while a catalog repeating a printing gains nothing. Equal
/// weights keep first-seen order, scanning branches in the order given.
pub fn weighted_merge(branches: Vec<(Source, Vec<CardCandidate>)>, depth: usize) -> Vec<CardCandidate> {
    let mut slots: Vec<Weighted> = Vec::new();
    let mut index: HashMap<DedupKey, usize> = HashMap::new();

    for (source, branch) in branches {
        for (position, candidate) in branch.into_iter().enumerate() {
            let weight = depth.saturating_sub(position).max(1);
            let key = DedupKey::of(&candidate);
            match index.get(&key) {
                Some(&slot) => {
                    let entry = &mut slots[slot];
                    let seed = std::mem::take(&mut entry.candidate);
                    entry.candidate = merge_candidates(seed, candidate);
                    if entry.weighed_by.insert(source) {
                        entry.weight += weight;
                    }
                }
                None => {
                    let first_seen = slots.len();
                    index.insert(key, first_seen);
                    slots.push(Weighted {
                        candidate,
                        weight,
                        weighed_by: BTreeSet::from([source]),
                        first_seen,
                    });
                }
            }
        }
    }

    slots.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.first_seen.cmp(&b.first_seen)));
    slots.into_iter().map(|w| w.candidate).collect()
}

fn truncate(mut results: Vec<CardCandidate>, max_results: usize) -> Vec<CardCandidate> {
    results.truncate(max_results);
    results
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
