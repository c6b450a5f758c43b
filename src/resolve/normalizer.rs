use crate::resolve::types::{NormalizedQuery, Stage};
use crate::resolve::NormalizerConfig;
use regex::{Match, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Label used in canonical folder names: `<Title> (<Year>) - IMDb- <Rating>`
pub const CATALOG_TAG: &str = "IMDb";

const MIN_YEAR: i32 = 1900;

// Bracketed tags, resolution markers and separators
fn noise_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[.*?\]|\b\d+p\b|[._-]").unwrap())
}

fn paren_char_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[()]").unwrap())
}

fn paren_group_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(.*?\)").unwrap())
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap())
}

fn season_episode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\b(?:Season|Episode)\s?\d+\b").unwrap())
}

fn resolution_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\d{3,4}p$").unwrap())
}

fn resolved_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r"^.* \((?:19|20)\d{{2}}\) - {}[-:]\s?\d+(?:\.\d+)?$",
            regex::escape(CATALOG_TAG)
        ))
        .unwrap()
    })
}

fn illegal_fs_chars_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap())
}

/// Trim and collapse runs of whitespace into single spaces
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lowercase_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

/// True iff the folder already follows the canonical naming convention
pub fn is_already_resolved(folder_name: &str) -> bool {
    resolved_name_pattern().is_match(folder_name)
}

/// Replace characters that are illegal in file names with a hyphen, one for one
pub fn sanitize_for_filesystem(name: &str) -> String {
    illegal_fs_chars_pattern().replace_all(name, "-").into_owned()
}

/// Turns raw folder names into progressively cleaner catalog queries
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    current_year: i32,
    extraneous_words: HashSet<String>,
    core_tags: HashSet<String>,
}

impl NameNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        let mut core_tags = lowercase_set(&config.release_tags);
        core_tags.extend(lowercase_set(&config.group_tags));

        Self {
            current_year: config.current_year,
            extraneous_words: lowercase_set(&config.extraneous_words),
            core_tags,
        }
    }

    /// First year token within [1900, current year]
    fn find_year<'t>(&self, text: &'t str) -> Option<(Match<'t>, i32)> {
        year_pattern().find_iter(text).find_map(|m| {
            let year: i32 = m.as_str().parse().ok()?;
            (MIN_YEAR..=self.current_year)
                .contains(&year)
                .then_some((m, year))
        })
    }

    pub fn extract_year(&self, raw: &str) -> Option<i32> {
        self.find_year(raw).map(|(_, year)| year)
    }

    /// Strip tags, markers and separators; cut everything after a valid year
    /// and re-append the year.
    pub fn sanitize(&self, raw: &str) -> NormalizedQuery {
        let cleaned = noise_pattern().replace_all(raw, " ");
        let cleaned = paren_char_pattern().replace_all(&cleaned, " ");
        let mut cleaned = collapse_whitespace(&cleaned);

        if let Some((m, year)) = self.find_year(&cleaned) {
            let title_part = cleaned[..m.start()].trim();
            cleaned = format!("{} {}", title_part, year).trim().to_string();
        }

        NormalizedQuery::new(cleaned, Stage::Sanitized)
    }

    /// First-stage query: the sanitized name, with the raw name's year
    /// appended when sanitizing dropped it (e.g. a year inside brackets).
    pub fn sanitized_query(&self, raw: &str) -> NormalizedQuery {
        let mut query = self.sanitize(raw);
        if let Some(year) = self.extract_year(raw) {
            let year = year.to_string();
            if !query.text.contains(&year) {
                query.text = collapse_whitespace(&format!("{} {}", query.text, year));
            }
        }
        query
    }

    /// Drop extraneous release words and any parenthetical groups left over
    pub fn simplify(&self, sanitized: &str) -> NormalizedQuery {
        let kept: Vec<&str> = sanitized
            .split_whitespace()
            .filter(|word| !self.extraneous_words.contains(&word.to_lowercase()))
            .collect();

        let joined = kept.join(" ");
        let simplified = paren_group_pattern().replace_all(&joined, " ");
        NormalizedQuery::new(collapse_whitespace(&simplified), Stage::Simplified)
    }

    /// Remove season/episode markers and codec, resolution and group tags
    pub fn extract_core_title(&self, simplified: &str) -> NormalizedQuery {
        let stripped = season_episode_pattern().replace_all(simplified, " ");

        let kept: Vec<&str> = stripped
            .split_whitespace()
            .filter(|word| !resolution_pattern().is_match(word))
            .filter(|word| !self.core_tags.contains(&word.to_lowercase()))
            .collect();

        NormalizedQuery::new(kept.join(" "), Stage::CoreTitle)
    }
}
