use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants::defaults;
use crate::error::{CourtsideError, Result};
use crate::extract::extract_json;
use crate::llm::{GenerationConfig, LlmClient, Message};
use crate::search::SearchClient;
use crate::stats::{Catalog, Category, CategoryFailure, StatsReport};

/// Runs a catalog: search, extract, parse, one category at a time.
///
/// Extraction calls are stateless single-message requests; they do not share
/// a conversation history.
pub struct StatsFetcher {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
    generation: GenerationConfig,
}

impl StatsFetcher {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchClient>) -> Self {
        Self {
            llm,
            search,
            generation: GenerationConfig::default()
                .with_temperature(defaults::EXTRACTION_TEMPERATURE),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Fetch every category in `catalog`.
    ///
    /// A category whose search fails, whose extraction call fails, or whose
    /// output does not parse is stored as `[]` and recorded in
    /// `report.failures`; the remaining categories are unaffected. An
    /// authentication failure aborts the run, since every later call would
    /// fail the same way.
    pub async fn fetch(&self, catalog: &Catalog, date: NaiveDate) -> Result<StatsReport> {
        let mut report = StatsReport::new(&catalog.name, date);

        for category in &catalog.categories {
            tracing::info!("Fetching {} ({})", category.key, category.query);
            match self.fetch_category(catalog, category).await {
                Ok(value) => report.insert(&category.key, value),
                Err(CategoryError::Fatal(e)) => return Err(e),
                Err(CategoryError::Skipped { reason, raw_output }) => {
                    tracing::warn!("Skipping {}: {}", category.key, reason);
                    report.insert_failure(CategoryFailure {
                        category: category.key.clone(),
                        reason,
                        raw_output,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn fetch_category(
        &self,
        catalog: &Catalog,
        category: &Category,
    ) -> std::result::Result<Value, CategoryError> {
        let search_results = self
            .search
            .search(&category.query)
            .await
            .map_err(CategoryError::skipped)?;

        let prompt = catalog.render_prompt(&search_results, category);
        let output = self
            .llm
            .chat(&[Message::user(prompt)], &self.generation)
            .await
            .map_err(|e| match e {
                CourtsideError::Auth { .. } => CategoryError::Fatal(e),
                other => CategoryError::skipped(other),
            })?;

        extract_json(&output).map_err(|e| CategoryError::Skipped {
            reason: e.to_string(),
            raw_output: Some(output.clone()),
        })
    }
}

enum CategoryError {
    Fatal(CourtsideError),
    Skipped {
        reason: String,
        raw_output: Option<String>,
    },
}

impl CategoryError {
    fn skipped(e: CourtsideError) -> Self {
        Self::Skipped {
            reason: e.to_string(),
            raw_output: None,
        }
    }
}
