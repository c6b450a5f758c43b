use regex::Regex;
use std::sync::OnceLock;

/// Desktop browser identity; the search page serves a stripped layout to unknown agents
pub(super) const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/102.0.0.0 Safari/537.36";

fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).unwrap())
}

fn title_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"tt\d+").unwrap())
}

/// Extract the first IMDb title id from the links of a search results page.
///
/// Only hrefs pointing at `imdb.com/title/tt...` count; ids mentioned in plain
/// text or in links to other sites are ignored.
pub fn extract_title_id(html: &str) -> Option<String> {
    href_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|href| href.as_str())
        .filter(|href| href.contains("imdb.com/title/tt"))
        .find_map(|href| title_id_pattern().find(href))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_title_link() {
        let html = r#"
            <a href="/search?q=inception">More</a>
            <a href="https://www.imdb.com/title/tt1375666/">Inception (2010) - IMDb</a>
            <a href="https://www.imdb.com/title/tt5295894/">Inception: The Cobol Job</a>
        "#;
        assert_eq!(extract_title_id(html), Some("tt1375666".to_string()));
    }

    #[test]
    fn test_ignores_non_title_links() {
        let html = r#"
            <p>See tt9999999 for details</p>
            <a href="https://www.imdb.com/name/nm0634240/">Christopher Nolan</a>
            <a href='/url?q=https://m.imdb.com/title/tt0816692/&amp;sa=U'>Interstellar</a>
        "#;
        assert_eq!(extract_title_id(html), Some("tt0816692".to_string()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_title_id("<html><body>Nothing here</body></html>"), None);
    }
}
