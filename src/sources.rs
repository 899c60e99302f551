//! Citation extraction.
//!
//! Each search-capable provider returns grounding metadata in its own
//! shape; extractors map them onto the uniform `{title, url, domain}`
//! source model. Unparsable URLs are dropped silently, never raised.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Maximum sources returned to the client per response.
pub const MAX_SOURCES: usize = 10;

/// A citation accompanying a grounded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Unix timestamp (seconds) of extraction.
    pub timestamp: u64,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let domain = domain_of(&url).unwrap_or_default();
        Self {
            title: title.into(),
            url,
            domain,
            snippet: None,
            timestamp: now(),
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn domain_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed.host_str().map(|h| h.trim_start_matches("www.").to_string())
}

/// Grok returns a flat `citations` array of URL strings.
pub fn from_citation_urls(urls: &[String]) -> Vec<Source> {
    let sources = urls
        .iter()
        .filter(|u| Url::parse(u).is_ok())
        .map(|u| {
            let domain = domain_of(u).unwrap_or_default();
            Source::new(domain.clone(), u.clone())
        })
        .collect();
    dedup_by_url(sources)
}

/// Gemini grounding metadata: `groundingChunks[].web.{uri,title}`.
/// Multiple chunks frequently reference the same URL; deduplicated here.
pub fn from_gemini_grounding(metadata: &Value) -> Vec<Source> {
    let chunks = metadata
        .get("groundingChunks")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let sources = chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let uri = web.get("uri")?.as_str()?;
            Url::parse(uri).ok()?;
            let title = web
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(uri)
                .to_string();
            Some(Source::new(title, uri))
        })
        .collect();

    dedup_by_url(sources)
}

/// Perplexity answers carry `citations` (URLs) and optionally
/// `search_results` with titles and snippets.
pub fn from_perplexity(response: &Value) -> Vec<Source> {
    if let Some(results) = response.get("search_results").and_then(Value::as_array) {
        let sources = results
            .iter()
            .filter_map(|r| {
                let url = r.get("url")?.as_str()?;
                Url::parse(url).ok()?;
                let title = r.get("title").and_then(Value::as_str).unwrap_or(url);
                let mut source = Source::new(title, url);
                if let Some(snippet) = r.get("snippet").and_then(Value::as_str) {
                    source = source.with_snippet(snippet);
                }
                Some(source)
            })
            .collect();
        return dedup_by_url(sources);
    }

    let urls: Vec<String> = response
        .get("citations")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    from_citation_urls(&urls)
}

/// Claude's web-search tool does not return structured citations in this
/// integration; a single synthetic placeholder stands in.
pub fn web_search_placeholder() -> Vec<Source> {
    vec![Source::new("Web Search Results", "https://www.anthropic.com")]
}

fn dedup_by_url(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = std::collections::HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .take(MAX_SOURCES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gemini_chunks_with_same_url_deduplicate() {
        let metadata = json!({
            "groundingChunks": [
                {"web": {"uri": "https://example.com/page", "title": "First title"}},
                {"web": {"uri": "https://example.com/page", "title": "Second title"}},
                {"web": {"uri": "https://other.org/x", "title": "Other"}}
            ]
        });
        let sources = from_gemini_grounding(&metadata);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "First title");
        assert_eq!(sources[0].domain, "example.com");
    }

    #[test]
    fn invalid_urls_are_dropped_silently() {
        let urls = vec!["not a url".to_string(), "https://valid.example/a".to_string()];
        let sources = from_citation_urls(&urls);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].url, "https://valid.example/a");
    }

    #[test]
    fn source_cap_is_enforced() {
        let urls: Vec<String> = (0..25)
            .map(|i| format!("https://site{i}.example.com/"))
            .collect();
        assert_eq!(from_citation_urls(&urls).len(), MAX_SOURCES);
    }

    #[test]
    fn perplexity_prefers_search_results_over_citations() {
        let response = json!({
            "citations": ["https://cite.example/only-url"],
            "search_results": [
                {"url": "https://rich.example/a", "title": "Rich", "snippet": "body"}
            ]
        });
        let sources = from_perplexity(&response);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Rich");
        assert_eq!(sources[0].snippet.as_deref(), Some("body"));
    }

    #[test]
    fn www_prefix_is_stripped_from_domain() {
        let source = Source::new("T", "https://www.seznam.cz/zpravy");
        assert_eq!(source.domain, "seznam.cz");
    }
}
