use crate::catalog::{Candidate, CandidateHandle, CatalogClient, CatalogError};
use crate::prompt::{InteractiveSelector, Selection};
use crate::resolve::normalizer::{is_already_resolved, NameNormalizer};
use crate::resolve::ranker::rank_candidates;
use crate::resolve::types::{NormalizedQuery, ResolutionOutcome, Stage};
use crate::resolve::PipelineConfig;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

/// Where the state machine goes after a stage came up empty
fn next_stage(stage: Stage, web_fallback: bool) -> Option<Stage> {
    match stage {
        Stage::Sanitized => Some(Stage::Simplified),
        Stage::Simplified => Some(Stage::CoreTitle),
        Stage::CoreTitle if web_fallback => Some(Stage::WebFallback),
        Stage::CoreTitle | Stage::WebFallback => Some(Stage::Custom),
        Stage::Custom => None,
    }
}

/// Per-folder run state
struct FolderRun<'a> {
    raw: &'a str,
    /// Year from the raw name, constant across stages
    target_year: Option<i32>,
    sanitized: NormalizedQuery,
    /// Query built by the previous text stage, whether or not it was sent
    previous: Option<NormalizedQuery>,
}

/// Escalates a folder name through the normalization stages until the
/// catalog returns candidates, then lets the operator decide.
pub struct ResolutionPipeline {
    catalog: Arc<dyn CatalogClient>,
    normalizer: NameNormalizer,
    config: PipelineConfig,
}

impl ResolutionPipeline {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        normalizer: NameNormalizer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            normalizer,
            config,
        }
    }

    /// Resolve one raw folder name.
    ///
    /// A catalog search failure aborts this folder only; detail fetch failures
    /// just drop the affected candidate.
    pub async fn resolve(
        &self,
        raw: &str,
        selector: &mut dyn InteractiveSelector,
    ) -> Result<ResolutionOutcome, PipelineError> {
        if is_already_resolved(raw) {
            info!("Skipping already properly named folder: {}", raw);
            return Ok(ResolutionOutcome::Skipped);
        }

        let sanitized = self.normalizer.sanitized_query(raw);
        info!("Sanitized name: {}", sanitized);

        let mut run = FolderRun {
            raw,
            target_year: self.normalizer.extract_year(raw),
            sanitized,
            previous: None,
        };

        let mut stage = Some(Stage::Sanitized);
        while let Some(current) = stage {
            let ranked = match current {
                Stage::WebFallback => self.web_fallback_stage(&run).await,
                Stage::Custom => match selector.ask_custom_query(&run.sanitized.text) {
                    Some(text) if !text.trim().is_empty() => {
                        let query = NormalizedQuery::new(text.trim(), Stage::Custom);
                        info!("Retrying with custom name: {}", query);
                        self.search_stage(&query, run.target_year).await?
                    }
                    _ => {
                        info!("No custom name provided for '{}'", run.raw);
                        Vec::new()
                    }
                },
                _ => {
                    let query = self.stage_query(current, &run);
                    let repeated = run.previous.as_ref().is_some_and(|p| p.same_text(&query));
                    run.previous = Some(query.clone());

                    if query.is_empty() {
                        info!("Skipping {} stage: empty query", current);
                        Vec::new()
                    } else if repeated {
                        info!("Skipping {} stage: query unchanged ({})", current, query);
                        Vec::new()
                    } else {
                        if current != Stage::Sanitized {
                            info!(
                                "No valid options found. Retrying with {} name: {}",
                                current, query
                            );
                        }
                        self.search_stage(&query, run.target_year).await?
                    }
                }
            };

            if !ranked.is_empty() {
                info!(
                    "Stage {} produced {} candidate(s) for '{}'",
                    current,
                    ranked.len(),
                    run.raw
                );
                return Ok(match selector.choose(&ranked) {
                    Some(Selection::Candidate(candidate)) => ResolutionOutcome::Resolved(candidate),
                    Some(Selection::Custom(title)) => ResolutionOutcome::ResolvedCustom(title),
                    None => ResolutionOutcome::Skipped,
                });
            }

            stage = next_stage(current, self.config.web_fallback);
        }

        info!("No candidates found for '{}' at any stage", raw);
        Ok(ResolutionOutcome::Exhausted)
    }

    /// Query for a text stage, derived from the previous stage's query
    fn stage_query(&self, stage: Stage, run: &FolderRun<'_>) -> NormalizedQuery {
        let previous = run.previous.as_ref().unwrap_or(&run.sanitized);
        match stage {
            Stage::Simplified => self.normalizer.simplify(&previous.text),
            Stage::CoreTitle => self.normalizer.extract_core_title(&previous.text),
            _ => run.sanitized.clone(),
        }
    }

    /// Search, fetch details with bounded concurrency, and rank
    async fn search_stage(
        &self,
        query: &NormalizedQuery,
        target_year: Option<i32>,
    ) -> Result<Vec<Candidate>, PipelineError> {
        let handles = self
            .catalog
            .search(&query.text, self.config.max_search_results)
            .await
            .map_err(|e| {
                warn!("Error during catalog search for '{}': {}", query, e);
                e
            })?;

        if handles.is_empty() {
            info!("No results for {} query '{}'", query.stage, query);
            return Ok(Vec::new());
        }

        let candidates = self.fetch_all(handles).await;
        Ok(rank_candidates(candidates, target_year))
    }

    async fn fetch_all(&self, handles: Vec<CandidateHandle>) -> Vec<Candidate> {
        let workers = self.config.fetch_workers.max(1);
        let catalog = &self.catalog;

        stream::iter(handles)
            .map(|handle| async move {
                match catalog.fetch_details(&handle).await {
                    Ok(candidate) => Some(candidate),
                    Err(e) => {
                        warn!("Error fetching details for title ID {}: {}", handle.id, e);
                        None
                    }
                }
            })
            .buffer_unordered(workers)
            .filter_map(|candidate| async move { candidate })
            .collect()
            .await
    }

    /// Degraded path: web search for a title id, then fetch it. Failures count as empty.
    async fn web_fallback_stage(&self, run: &FolderRun<'_>) -> Vec<Candidate> {
        info!("Trying web search fallback for '{}'", run.sanitized);

        let id = match self.catalog.fallback_id_search(&run.sanitized.text).await {
            Ok(Some(id)) => id,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Web search fallback failed for '{}': {}", run.sanitized, e);
                return Vec::new();
            }
        };

        match self
            .catalog
            .fetch_details(&CandidateHandle::from_id(id.as_str()))
            .await
        {
            Ok(candidate) => vec![candidate],
            Err(e) => {
                warn!("Error fetching details for title ID {}: {}", id, e);
                Vec::new()
            }
        }
    }
}
