// Test support utilities for unit tests

use crate::catalog::{Candidate, CandidateHandle, CatalogClient, CatalogError};
use crate::prompt::{InteractiveSelector, Selection};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Build a candidate whose source id is derived from its title
pub fn candidate(title: &str, year: Option<i32>, votes: u64) -> Candidate {
    Candidate {
        title: title.to_string(),
        year,
        rating: 7.5,
        votes,
        source_id: format!("tt-{}", title.to_lowercase().replace(' ', "-")),
    }
}

/// In-memory catalog keyed by exact query text.
///
/// Records every query it receives so tests can assert on stage escalation.
#[derive(Default)]
pub struct MockCatalog {
    results: HashMap<String, Vec<Candidate>>,
    fallback_ids: HashMap<String, String>,
    failing_fetches: HashSet<String>,
    failing_searches: Mutex<u32>,
    search_log: Mutex<Vec<String>>,
    fallback_log: Mutex<Vec<String>>,
    fetch_delay: Option<Duration>,
    fetches_in_flight: AtomicUsize,
    peak_fetches: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.results.insert(query.to_string(), candidates);
        self
    }

    pub fn with_fallback(mut self, query: &str, candidate: Candidate) -> Self {
        self.fallback_ids
            .insert(query.to_string(), candidate.source_id.clone());
        self.results
            .entry(format!("id:{}", candidate.source_id))
            .or_default()
            .push(candidate);
        self
    }

    /// Make `fetch_details` fail for the candidate with this source id
    pub fn failing_fetch(mut self, source_id: &str) -> Self {
        self.failing_fetches.insert(source_id.to_string());
        self
    }

    /// Make the next `count` search calls fail
    pub fn failing_search_attempts(self, count: u32) -> Self {
        *self.failing_searches.lock().unwrap() = count;
        self
    }

    /// Hold every `fetch_details` call open for `delay`
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Highest number of `fetch_details` calls seen running at once
    pub fn peak_concurrent_fetches(&self) -> usize {
        self.peak_fetches.load(Ordering::SeqCst)
    }

    pub fn searched_queries(&self) -> Vec<String> {
        self.search_log.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_log.lock().unwrap().len()
    }

    pub fn fallback_queries(&self) -> Vec<String> {
        self.fallback_log.lock().unwrap().clone()
    }

    fn find_by_id(&self, id: &str) -> Option<&Candidate> {
        self.results.values().flatten().find(|c| c.source_id == id)
    }
}

#[async_trait::async_trait]
impl CatalogClient for MockCatalog {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateHandle>, CatalogError> {
        self.search_log.lock().unwrap().push(query.to_string());

        {
            let mut failing = self.failing_searches.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(CatalogError::Api("connection reset".to_string()));
            }
        }

        Ok(self
            .results
            .get(query)
            .map(|candidates| {
                candidates
                    .iter()
                    .take(limit)
                    .map(|c| CandidateHandle {
                        id: c.source_id.clone(),
                        title: c.title.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_details(&self, handle: &CandidateHandle) -> Result<Candidate, CatalogError> {
        let running = self.fetches_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_fetches.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.fetches_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_fetches.contains(&handle.id) {
            return Err(CatalogError::Api(format!("timeout fetching {}", handle.id)));
        }
        self.find_by_id(&handle.id)
            .cloned()
            .ok_or_else(|| CatalogError::Api(format!("unknown id {}", handle.id)))
    }

    async fn fallback_id_search(&self, query: &str) -> Result<Option<String>, CatalogError> {
        self.fallback_log.lock().unwrap().push(query.to_string());
        Ok(self.fallback_ids.get(query).cloned())
    }
}

enum ScriptedChoice {
    Pick(usize),
    Name(String),
}

/// Selector that replays scripted answers and records what it was shown
#[derive(Default)]
pub struct ScriptedSelector {
    choices: VecDeque<ScriptedChoice>,
    custom_queries: VecDeque<Option<String>>,
    pub shown: Vec<Vec<Candidate>>,
    pub custom_prompts: Vec<String>,
}

impl ScriptedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the 1-indexed entry of the next list shown
    pub fn picking(mut self, index: usize) -> Self {
        self.choices.push_back(ScriptedChoice::Pick(index));
        self
    }

    pub fn naming(mut self, title: &str) -> Self {
        self.choices
            .push_back(ScriptedChoice::Name(title.to_string()));
        self
    }

    pub fn answering_custom(mut self, query: Option<&str>) -> Self {
        self.custom_queries.push_back(query.map(str::to_string));
        self
    }
}

impl InteractiveSelector for ScriptedSelector {
    fn choose(&mut self, candidates: &[Candidate]) -> Option<Selection> {
        self.shown.push(candidates.to_vec());
        match self.choices.pop_front()? {
            ScriptedChoice::Pick(index) => candidates
                .get(index.checked_sub(1)?)
                .cloned()
                .map(Selection::Candidate),
            ScriptedChoice::Name(title) => Some(Selection::Custom(title)),
        }
    }

    fn ask_custom_query(&mut self, failed_query: &str) -> Option<String> {
        self.custom_prompts.push(failed_query.to_string());
        self.custom_queries.pop_front().flatten()
    }
}
