use crate::catalog::{Candidate, CandidateHandle, CatalogClient, CatalogError};
use crate::retry::{RetryExhausted, RetryPolicy};

/// Applies a [`RetryPolicy`] around every call of the wrapped client.
///
/// Exhausted retries surface as [`CatalogError::Unavailable`].
pub struct RetryingCatalog<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: CatalogClient> RetryingCatalog<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

fn unavailable(operation: &str, exhausted: RetryExhausted<CatalogError>) -> CatalogError {
    CatalogError::Unavailable {
        operation: operation.to_string(),
        attempts: exhausted.attempts,
        last_error: exhausted.last_error.to_string(),
    }
}

#[async_trait::async_trait]
impl<C: CatalogClient> CatalogClient for RetryingCatalog<C> {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateHandle>, CatalogError> {
        self.policy
            .run("search", || self.inner.search(query, limit))
            .await
            .map_err(|e| unavailable("search", e))
    }

    async fn fetch_details(&self, handle: &CandidateHandle) -> Result<Candidate, CatalogError> {
        self.policy
            .run("fetch_details", || self.inner.fetch_details(handle))
            .await
            .map_err(|e| unavailable("fetch_details", e))
    }

    async fn fallback_id_search(&self, query: &str) -> Result<Option<String>, CatalogError> {
        self.policy
            .run("fallback_id_search", || self.inner.fallback_id_search(query))
            .await
            .map_err(|e| unavailable("fallback_id_search", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{candidate, MockCatalog};
    use std::time::Duration;

    #[tokio::test]
    async fn test_transient_search_failures_recover() {
        let mock = MockCatalog::new()
            .with_results("Inception 2010", vec![candidate("Inception", Some(2010), 100)])
            .failing_search_attempts(2);
        let catalog = RetryingCatalog::new(mock, RetryPolicy::new(3, Duration::ZERO));

        let handles = catalog.search("Inception 2010", 10).await.unwrap();

        assert_eq!(handles.len(), 1);
        assert_eq!(catalog.inner().search_calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_search_is_unavailable() {
        let mock = MockCatalog::new().failing_search_attempts(10);
        let catalog = RetryingCatalog::new(mock, RetryPolicy::new(3, Duration::ZERO));

        let err = catalog.search("Anything", 10).await.unwrap_err();

        match err {
            CatalogError::Unavailable {
                operation,
                attempts,
                ..
            } => {
                assert_eq!(operation, "search");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
        assert_eq!(catalog.inner().search_calls(), 3);
    }
}
