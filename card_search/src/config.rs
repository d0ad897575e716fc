//! Search engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tcg_common::Source;

/// Tag mixed into every cache key. Bump it whenever filtering or ranking
/// changes so results computed by older logic are never served.
pub const LOGIC_VERSION: &str = "v3";

/// Connection settings for one catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub search_path: String,
    pub timeout_ms: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full search endpoint URL without query string
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub logic_version: String,
    /// Age after which a cache entry is stale
    pub cache_ttl_secs: u64,
    /// Maximum number of cached queries
    pub cache_capacity: usize,
    /// Records requested from each catalog per search
    pub provider_limit: usize,
    /// Result count when the caller does not pass one
    pub default_max_results: usize,
    pub pokemon_tcg: ProviderConfig,
    pub tcgdex: ProviderConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            logic_version: LOGIC_VERSION.to_string(),
            cache_ttl_secs: 24 * 60 * 60,
            cache_capacity: 200,
            provider_limit: 30,
            default_max_results: 20,
            pokemon_tcg: ProviderConfig {
                base_url: "http://localhost:3001".to_string(),
                search_path: "/api/pokemon-tcg/search".to_string(),
                timeout_ms: 8_000,
            },
            tcgdex: ProviderConfig {
                base_url: "http://localhost:3001".to_string(),
                search_path: "/api/tcgdex/search".to_string(),
                timeout_ms: 5_000,
            },
        }
    }
}

impl SearchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn provider(&self, source: Source) -> &ProviderConfig {
        match source {
            Source::PokemonTcg => &self.pokemon_tcg,
            Source::Tcgdex => &self.tcgdex,
        }
    }

    /// Point both catalogs at the same host (proxy deployments, mock servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.pokemon_tcg.base_url = base_url.to_string();
        self.tcgdex.base_url = base_url.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_have_separate_deadlines() {
        let config = SearchConfig::default();
        assert_eq!(config.provider(Source::PokemonTcg).timeout(), Duration::from_secs(8));
        assert_eq!(config.provider(Source::Tcgdex).timeout(), Duration::from_secs(5));
        assert_eq!(config.cache_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn search_url_joins_slashes_once() {
        let provider = ProviderConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            search_path: "/api/tcgdex/search".to_string(),
            timeout_ms: 100,
        };
        assert_eq!(provider.search_url(), "http://127.0.0.1:9000/api/tcgdex/search");
    }

    #[test]
    fn with_base_url_rewrites_both_catalogs() {
        let config = SearchConfig::default().with_base_url("http://mock:1234");
        assert_eq!(config.pokemon_tcg.base_url, "http://mock:1234");
        assert_eq!(config.tcgdex.base_url, "http://mock:1234");
        assert_eq!(config.tcgdex.search_path, "/api/tcgdex/search");
    }
}
