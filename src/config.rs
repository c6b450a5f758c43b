use crate::resolve::{NormalizerConfig, PipelineConfig};
use crate::retry::RetryPolicy;
use chrono::Datelike;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
///
/// Loaded from the environment, with an optional `.env` file in the working
/// directory.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory whose immediate subdirectories get renamed
    pub root_path: PathBuf,
    /// Append-only log file
    pub log_file: PathBuf,
    /// OMDb API key
    pub omdb_api_key: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub max_search_results: usize,
    pub fetch_workers: usize,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Enable the web-search fallback stage
    pub web_fallback: bool,
    /// Upper bound for year tokens in folder names
    pub current_year: i32,
}

fn parse_var<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) if v.is_empty() || v == "false" || v == "0" || v == "no" => Ok(false),
        Some(v) if v == "true" || v == "1" || v == "yes" => Ok(true),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: value.unwrap_or_default(),
        }),
    }
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let omdb_api_key = get("OMDB_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar("OMDB_API_KEY"))?;

        Ok(Self {
            root_path: get("REELNAME_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            log_file: get("REELNAME_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("reelname.log")),
            omdb_api_key: omdb_api_key.trim().to_string(),
            max_retries: parse_var("REELNAME_MAX_RETRIES", get("REELNAME_MAX_RETRIES"), 3)?,
            retry_delay: Duration::from_secs(parse_var(
                "REELNAME_RETRY_DELAY_SECS",
                get("REELNAME_RETRY_DELAY_SECS"),
                10,
            )?),
            max_search_results: parse_var(
                "REELNAME_MAX_SEARCH_RESULTS",
                get("REELNAME_MAX_SEARCH_RESULTS"),
                10,
            )?,
            fetch_workers: parse_var("REELNAME_FETCH_WORKERS", get("REELNAME_FETCH_WORKERS"), 5)?,
            request_timeout: Duration::from_secs(parse_var(
                "REELNAME_REQUEST_TIMEOUT_SECS",
                get("REELNAME_REQUEST_TIMEOUT_SECS"),
                30,
            )?),
            web_fallback: parse_bool("REELNAME_WEB_FALLBACK", get("REELNAME_WEB_FALLBACK"))?,
            current_year: chrono::Local::now().year(),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig::with_current_year(self.current_year)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_search_results: self.max_search_results.max(1),
            fetch_workers: self.fetch_workers.max(1),
            web_fallback: self.web_fallback,
        }
    }
}
