use serde::Deserialize;

/// A catalog record considered as a possible match for a folder
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub year: Option<i32>,
    /// 0.0 when the catalog has no rating
    pub rating: f32,
    /// 0 when the catalog has no vote count
    pub votes: u64,
    /// IMDb title id (e.g. "tt1375666")
    pub source_id: String,
}

/// Opaque search hit, resolved to a [`Candidate`] by `fetch_details`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateHandle {
    pub id: String,
    /// Title as shown in the search listing, for logging only
    pub title: String,
}

impl CandidateHandle {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
        }
    }
}

/// OMDb search response wrapper
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub(super) search: Vec<SearchResult>,
    #[serde(rename = "Response")]
    pub(super) response: String,
    #[serde(rename = "Error")]
    pub(super) error: Option<String>,
}

/// Individual search result
#[derive(Debug, Deserialize)]
pub(super) struct SearchResult {
    #[serde(rename = "Title")]
    pub(super) title: String,
    #[serde(rename = "imdbID")]
    pub(super) imdb_id: String,
}

/// Detailed title response from OMDb
#[derive(Debug, Deserialize)]
pub(super) struct TitleResponse {
    #[serde(rename = "Response")]
    pub(super) response: String,
    #[serde(rename = "Error")]
    pub(super) error: Option<String>,
    #[serde(rename = "Title")]
    pub(super) title: Option<String>,
    #[serde(rename = "Year")]
    pub(super) year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub(super) imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub(super) imdb_votes: Option<String>,
    #[serde(rename = "imdbID")]
    pub(super) imdb_id: Option<String>,
}

/// Error body OMDb sends alongside non-success statuses
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(rename = "Error")]
    pub(super) error: Option<String>,
}
