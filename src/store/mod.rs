//! Metadata resolver: read-only queries against the hosted VOD metadata
//! store (REST-over-Postgres) and normalization of its rows.

pub mod query;
pub mod rows;

pub use query::ListFilter;

use crate::config::StoreConfig;
use crate::error::{FailureClass, Result, VodError};
use crate::keys::{compute_lookup_key, is_lookup_key};
use crate::types::VideoRecord;
use rows::VideoRow;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client for the metadata store. Holds only the HTTP client and fixed
/// configuration, so any number of calls can run concurrently on one
/// instance; an in-flight call is abandoned by dropping its future.
pub struct MetadataResolver {
    client: reqwest::Client,
    config: StoreConfig,
}

impl MetadataResolver {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Exact lookup of one record by its lookup key. `Ok(None)` means the
    /// video has no metadata yet, which is a normal outcome and distinct
    /// from any connectivity or server failure.
    #[instrument(skip(self))]
    pub async fn resolve_by_key(&self, key: &str) -> Result<Option<VideoRecord>> {
        if !is_lookup_key(key) {
            return Err(VodError::Validation(format!(
                "malformed lookup key: {}",
                key
            )));
        }

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let raw = self
            .fetch_rows(&query::by_key_params(key), Some(timeout))
            .await?;

        match raw.into_iter().next() {
            Some(row) => Ok(Some(rows::map_row(row)?)),
            None => {
                debug!("no metadata row for key");
                Ok(None)
            }
        }
    }

    /// Convenience composition of the hasher with the exact lookup.
    pub async fn resolve_url(&self, url: &str) -> Result<Option<VideoRecord>> {
        let key = compute_lookup_key(url)?;
        self.resolve_by_key(&key).await
    }

    /// Diary listing: newest first, undated records last. Zero matches is
    /// an empty vector, never an error.
    pub async fn list_recent(&self, filter: &ListFilter) -> Result<Vec<VideoRecord>> {
        let raw = self.fetch_rows(&query::recent_params(filter), None).await?;
        let mut records = raw
            .into_iter()
            .map(rows::map_row)
            .collect::<Result<Vec<_>>>()?;
        rows::sort_by_published_desc(&mut records);
        info!(count = records.len(), "listed recent records");
        Ok(records)
    }

    /// Free-text search. The store narrows on title and URL to bound the
    /// payload; the authoritative match (including tags, which the store's
    /// pattern filter cannot see) happens here after mapping.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<VideoRecord>> {
        let needle = term.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self
            .fetch_rows(&query::search_params(needle, limit), None)
            .await?;
        let fetched = raw.len();

        let mut records = raw
            .into_iter()
            .map(rows::map_row)
            .collect::<Result<Vec<_>>>()?;
        let needle = needle.to_lowercase();
        records.retain(|record| rows::matches_search_term(record, &needle));
        rows::sort_by_published_desc(&mut records);

        debug!(fetched, kept = records.len(), "filtered search rows client-side");
        Ok(records)
    }

    async fn fetch_rows(
        &self,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Vec<VideoRow>> {
        let endpoint = self.config.rest_endpoint();
        let mut request = self
            .client
            .get(&endpoint)
            .header("apikey", &self.config.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params);
        if let Some(bound) = timeout {
            request = request.timeout(bound);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "store returned non-success status");
            return Err(VodError::Request {
                classification: FailureClass::from_status(status.as_u16()),
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport(e))?;
        serde_json::from_str(&body)
            .map_err(|e| VodError::ResponseFormat(format!("expected a JSON row array: {}", e)))
    }

    fn classify_transport(&self, error: reqwest::Error) -> VodError {
        if error.is_timeout() {
            VodError::Timeout(self.config.timeout_seconds)
        } else {
            VodError::Network(error)
        }
    }
}
