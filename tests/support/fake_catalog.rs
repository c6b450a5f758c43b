use reelname::catalog::{Candidate, CandidateHandle, CatalogClient, CatalogError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Catalog double keyed by exact query text.
///
/// Queries listed in `outages` fail with a transport-style error the first
/// `n` times they are searched.
#[derive(Default)]
pub struct FakeCatalog {
    by_query: HashMap<String, Vec<Candidate>>,
    outages: Mutex<HashMap<String, u32>>,
    queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.by_query.insert(query.to_string(), candidates);
        self
    }

    pub fn with_outage(self, query: &str, failures: u32) -> Self {
        self.outages
            .lock()
            .unwrap()
            .insert(query.to_string(), failures);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateHandle>, CatalogError> {
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(remaining) = self.outages.lock().unwrap().get_mut(query) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CatalogError::Api("503 Service Unavailable".to_string()));
            }
        }

        Ok(self
            .by_query
            .get(query)
            .into_iter()
            .flatten()
            .take(limit)
            .map(|c| CandidateHandle {
                id: c.source_id.clone(),
                title: c.title.clone(),
            })
            .collect())
    }

    async fn fetch_details(&self, handle: &CandidateHandle) -> Result<Candidate, CatalogError> {
        self.by_query
            .values()
            .flatten()
            .find(|c| c.source_id == handle.id)
            .cloned()
            .ok_or_else(|| CatalogError::Api(format!("unknown id {}", handle.id)))
    }

    async fn fallback_id_search(&self, _query: &str) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }
}
