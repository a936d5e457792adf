mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use crate::error::CourtsideError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// The web-search collaborator: a free-text query in, unstructured text out.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, CourtsideError>;
}

/// Flatten results into the plain-text form handed to the extraction prompt.
pub fn render_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            if r.snippet.is_empty() {
                format!("{} ({})", r.title, r.url)
            } else {
                format!("{}: {} ({})", r.title, r.snippet, r.url)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
