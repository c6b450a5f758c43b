// # Resolve Module
//
// Name resolution for one folder:
//
// - **NameNormalizer**: raw folder name → sanitized → simplified → core title
// - **ranker**: orders catalog candidates (year match first, then votes)
// - **ResolutionPipeline**: escalates through the stages until the catalog
//   returns something, then hands the ranked list to the operator

mod normalizer;
mod pipeline;
mod ranker;
mod types;

pub use normalizer::{is_already_resolved, sanitize_for_filesystem, NameNormalizer, CATALOG_TAG};
pub use pipeline::{PipelineError, ResolutionPipeline};
pub use ranker::rank_candidates;
pub use types::{NormalizedQuery, ResolutionOutcome, Stage};

const DEFAULT_EXTRANEOUS_WORDS: &[&str] = &[
    "COMPLETE", "720p", "1080p", "BRrip", "BluRay", "HDRip", "sujaidr", "pimprg", "YTS", "MX",
    "x264", "x265", "HEVC", "AAC", "WEBRip", "WebDL", "H.264", "H.265", "DVDrip", "BRRip",
];

const DEFAULT_RELEASE_TAGS: &[&str] = &[
    "BRRip", "BluRay", "HDRip", "WebDL", "WEBRip", "x264", "x265", "HEVC", "AAC", "H.264",
    "H.265", "DVDrip",
];

const DEFAULT_GROUP_TAGS: &[&str] = &["sujaidr", "pimprg", "YTS", "MX"];

fn to_owned_words(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Word lists and clock used by [`NameNormalizer`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    /// Upper bound for year tokens; injected so tests can pin it
    pub current_year: i32,
    /// Dropped by the simplify stage
    pub extraneous_words: Vec<String>,
    /// Codec/source tags dropped by core-title extraction
    pub release_tags: Vec<String>,
    /// Release group tags dropped by core-title extraction
    pub group_tags: Vec<String>,
}

impl NormalizerConfig {
    pub fn with_current_year(current_year: i32) -> Self {
        Self {
            current_year,
            extraneous_words: to_owned_words(DEFAULT_EXTRANEOUS_WORDS),
            release_tags: to_owned_words(DEFAULT_RELEASE_TAGS),
            group_tags: to_owned_words(DEFAULT_GROUP_TAGS),
        }
    }
}

/// Catalog fan-out settings for [`ResolutionPipeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Cap on search hits considered per stage
    pub max_search_results: usize,
    /// Concurrent detail fetches per stage
    pub fetch_workers: usize,
    /// Try the web-search fallback between core-title and custom retry
    pub web_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_search_results: 10,
            fetch_workers: 5,
            web_fallback: false,
        }
    }
}
