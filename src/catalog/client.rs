use crate::catalog::fallback::{self, FALLBACK_USER_AGENT};
use crate::catalog::models::{
    Candidate, CandidateHandle, ErrorResponse, SearchResponse, TitleResponse,
};
use crate::catalog::{CatalogClient, CatalogError};
use regex::Regex;
use reqwest::{Client, Response};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "reelname/0.1";

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    fallback_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://www.omdbapi.com".to_string(),
            fallback_url: "https://www.google.com/search".to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        // OMDb answers 401 both for bad keys and for exhausted daily quotas
        if response.status() == 401 {
            let body = response.text().await?;
            let err = classify_unauthorized(&body);
            warn!("✗ OMDb refused the request: {}", err);
            return Err(err);
        }

        let response = check_status(response)?;
        Ok(response.text().await?)
    }

    async fn search_title(
        &self,
        title: &str,
        year: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CandidateHandle>, CatalogError> {
        let body = match year {
            Some(year) => {
                debug!("OMDb search: s={} y={}", title, year);
                self.get_json(&[("s", title), ("y", year)]).await?
            }
            None => {
                debug!("OMDb search: s={}", title);
                self.get_json(&[("s", title)]).await?
            }
        };
        parse_search_response(&body, limit)
    }
}

fn trailing_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*\S)\s+((?:19|20)\d{2})$").unwrap())
}

/// Split `"Inception 2010"` into the title and the year OMDb takes as `y=`
fn split_trailing_year(query: &str) -> Option<(&str, &str)> {
    let caps = trailing_year_pattern().captures(query.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status == 429 {
        warn!("✗ OMDb rate limit exceeded");
        Err(CatalogError::RateLimit)
    } else {
        warn!("✗ OMDb API error: {}", status);
        match response.error_for_status() {
            Err(e) => Err(CatalogError::Request(e)),
            Ok(_) => Err(CatalogError::Api(format!("Unexpected status {}", status))),
        }
    }
}

/// Map an OMDb `"Response":"False"` error message onto the catalog error taxonomy.
/// Returns `None` for messages that simply mean "no results".
fn classify_api_error(message: &str) -> Option<CatalogError> {
    let lower = message.to_lowercase();
    if lower.contains("not found") || lower.contains("too many results") {
        None
    } else if lower.contains("api key") {
        Some(CatalogError::InvalidApiKey)
    } else if lower.contains("limit") {
        Some(CatalogError::RateLimit)
    } else {
        Some(CatalogError::Api(message.to_string()))
    }
}

/// Error for a 401 response, told apart by the message in its body
fn classify_unauthorized(body: &str) -> CatalogError {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .and_then(|message| classify_api_error(&message))
        .unwrap_or(CatalogError::InvalidApiKey)
}

/// Parse an OMDb search body into at most `limit` handles
pub(crate) fn parse_search_response(
    body: &str,
    limit: usize,
) -> Result<Vec<CandidateHandle>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    if response.response != "True" {
        let message = response.error.unwrap_or_default();
        return match classify_api_error(&message) {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    Ok(response
        .search
        .into_iter()
        .take(limit)
        .map(|result| CandidateHandle {
            id: result.imdb_id,
            title: result.title,
        })
        .collect())
}

/// Parse an OMDb title body, filling defaults for the fields IMDb leaves blank
pub(crate) fn parse_title_response(
    body: &str,
    handle: &CandidateHandle,
) -> Result<Candidate, CatalogError> {
    let response: TitleResponse = serde_json::from_str(body)?;

    if response.response != "True" {
        let message = response
            .error
            .unwrap_or_else(|| format!("No details for {}", handle.id));
        return Err(classify_api_error(&message).unwrap_or(CatalogError::Api(message)));
    }

    let title = response
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Unknown Title".to_string());

    Ok(Candidate {
        title,
        year: response.year.as_deref().and_then(parse_year),
        rating: response
            .imdb_rating
            .as_deref()
            .and_then(parse_rating)
            .unwrap_or(0.0),
        votes: response
            .imdb_votes
            .as_deref()
            .and_then(parse_votes)
            .unwrap_or(0),
        source_id: response.imdb_id.unwrap_or_else(|| handle.id.clone()),
    })
}

/// Leading four digits of an OMDb year ("2010", "2010–2013", "2019–")
fn parse_year(value: &str) -> Option<i32> {
    let digits: String = value.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn parse_rating(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|r| (0.0..=10.0).contains(r))
}

fn parse_votes(value: &str) -> Option<u64> {
    value.trim().replace(',', "").parse().ok()
}

#[async_trait::async_trait]
impl CatalogClient for OmdbClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateHandle>, CatalogError> {
        let handles = match split_trailing_year(query) {
            Some((title, year)) => {
                let handles = self.search_title(title, Some(year), limit).await?;
                if handles.is_empty() {
                    debug!("No OMDb results for '{}' in {}, retrying without year", title, year);
                    self.search_title(title, None, limit).await?
                } else {
                    handles
                }
            }
            None => self.search_title(query, None, limit).await?,
        };
        info!("✓ OMDb search '{}' returned {} result(s)", query, handles.len());
        Ok(handles)
    }

    async fn fetch_details(&self, handle: &CandidateHandle) -> Result<Candidate, CatalogError> {
        debug!("OMDb lookup: i={} ({})", handle.id, handle.title);
        let body = self.get_json(&[("i", handle.id.as_str())]).await?;
        parse_title_response(&body, handle)
    }

    async fn fallback_id_search(&self, query: &str) -> Result<Option<String>, CatalogError> {
        let q = format!("{} site:imdb.com", query);
        let response = self
            .client
            .get(&self.fallback_url)
            .query(&[("q", q.as_str()), ("num", "1"), ("hl", "en")])
            .header("User-Agent", FALLBACK_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "Failed to fetch web search page. Status code: {}",
                response.status()
            );
            return Ok(None);
        }

        let html = response.text().await?;
        let id = fallback::extract_title_id(&html);
        match &id {
            Some(id) => info!("Found IMDb ID {} for '{}'", id, query),
            None => warn!("No IMDb ID found in web results for '{}'", query),
        }
        Ok(id)
    }
}
