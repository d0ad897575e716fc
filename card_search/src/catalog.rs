//! HTTP client for one card catalog
//!
//! Both catalogs are queried with `GET <search_url>?q=<query>&limit=<n>` and
//! answer with the shared `{success, results}` envelope.

use crate::config::ProviderConfig;
use std::time::Duration;
use tcg_common::records::normalize_results;
use tcg_common::{CardCandidate, Envelope, ProviderError, Source};

const USER_AGENT: &str = "card_search/1.0";

/// Search client bound to one catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    source: Source,
    client: reqwest::Client,
    search_url: String,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(source: Source, config: &ProviderConfig) -> Self {
        Self::with_client(source, config, reqwest::Client::new())
    }

    /// Share one connection pool between catalogs
    pub fn with_client(source: Source, config: &ProviderConfig, client: reqwest::Client) -> Self {
        Self {
            source,
            client,
            search_url: config.search_url(),
            timeout: config.timeout(),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch and normalize one page of results. Malformed records are dropped.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<CardCandidate>, ProviderError> {
        let url = format!(
            "{}?q={}&limit={}",
            self.search_url,
            urlencoding::encode(query),
            limit
        );
        log::debug!("Searching {}: {}", self.source, url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ProviderError::Unsuccessful(self.source));
        }

        let received = envelope.results.len();
        let candidates = normalize_results(self.source, envelope.results);
        log::debug!(
            "{} returned {} records ({} usable)",
            self.source,
            received,
            candidates.len()
        );
        Ok(candidates)
    }

    /// [`search`](Self::search) raced against this catalog's deadline
    pub async fn search_with_timeout(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CardCandidate>, ProviderError> {
        match tokio::time::timeout(self.timeout, self.search(query, limit)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.source, self.timeout)),
        }
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
