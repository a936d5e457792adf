use crate::constants::{endpoints, limits};
use crate::error::CourtsideError;
use crate::search::{render_results, SearchClient, SearchResult};
use std::time::Duration;

/// Searches the DuckDuckGo HTML endpoint. No API key required.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self, CourtsideError> {
        Self::with_options(
            limits::SEARCH_MAX_RESULTS,
            Duration::from_secs(limits::SEARCH_TIMEOUT_SECS),
        )
    }

    pub fn with_options(max_results: usize, timeout: Duration) -> Result<Self, CourtsideError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Courtside/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CourtsideError::Search(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            base_url: endpoints::DUCKDUCKGO_HTML_URL.to_string(),
            max_results,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn search_results(&self, query: &str) -> Result<Vec<SearchResult>, CourtsideError> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CourtsideError::Search(format!("Search request failed: {e}")))?;

        let status = response.status();
        let html = response
            .text()
            .await
            .map_err(|e| CourtsideError::Search(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(CourtsideError::Search(format!(
                "Search returned HTTP {status}"
            )));
        }

        let results = parse_ddg_results(&html, self.max_results);
        tracing::debug!("Search {:?} returned {} results", query, results.len());
        Ok(results)
    }
}

#[async_trait::async_trait]
impl SearchClient for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, CourtsideError> {
        let results = self.search_results(query).await?;
        if results.is_empty() {
            return Ok("No good search result found".to_string());
        }
        Ok(render_results(&results))
    }
}

pub(crate) fn parse_ddg_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    // Result links carry class="result__a", snippets class="result__snippet"
    for segment in html.split("class=\"result__a\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let url = extract_between(segment, "href=\"", "\"").unwrap_or_default();
        let title = extract_between(segment, ">", "</a>").unwrap_or_default();
        let snippet = segment
            .find("class=\"result__snippet\"")
            .and_then(|start| extract_between(&segment[start..], ">", "</a>"))
            .unwrap_or_default();

        // Skip internal links
        if url.is_empty() || (url.starts_with('/') && !url.contains("uddg=")) {
            continue;
        }

        results.push(SearchResult {
            title: clean_text(&title),
            url: clean_url(&url),
            snippet: clean_text(&snippet),
        });
    }

    results
}

/// Result links are wrapped in a redirect carrying the target in `uddg=`.
fn clean_url(url: &str) -> String {
    match url.split("uddg=").nth(1) {
        Some(rest) => {
            let encoded = rest.split('&').next().unwrap_or(rest);
            urlencoding::decode(encoded)
                .map(|u| u.into_owned())
                .unwrap_or_else(|_| url.to_string())
        }
        None => url.to_string(),
    }
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}

fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
        .replace("&amp;", "&")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
