// # Catalog Module
//
// Read-only access to the title catalog (IMDb records served by OMDb):
//
// - **CatalogClient**: search, detail lookup and the web-search fallback
// - **OmdbClient**: HTTP implementation against the OMDb JSON API
// - **RetryingCatalog**: wraps any client with the shared retry policy
// - **fallback**: scrapes a web search for IMDb title ids

mod client;
mod fallback;
mod models;
mod retrying;

pub use client::OmdbClient;
pub use models::{Candidate, CandidateHandle};
pub use retrying::RetryingCatalog;

use reqwest::Error as ReqwestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API rate limit exceeded")]
    RateLimit,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Catalog error: {0}")]
    Api(String),
    #[error("Catalog unavailable: {operation} failed after {attempts} attempt(s): {last_error}")]
    Unavailable {
        operation: String,
        attempts: u32,
        last_error: String,
    },
}

/// Search and lookup operations against the title catalog (allows mocking for tests)
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search returning at most `limit` handles. No match is an empty list.
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<CandidateHandle>, CatalogError>;

    /// Resolve a handle to a full candidate, defaulting missing rating and votes
    async fn fetch_details(&self, handle: &CandidateHandle) -> Result<Candidate, CatalogError>;

    /// Best-effort web search scoped to the catalog site, returning the first title id found
    async fn fallback_id_search(&self, query: &str) -> Result<Option<String>, CatalogError>;
}
