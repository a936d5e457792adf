//! What to fetch: the categories, their search queries, and the extraction prompt.

/// One entry in a report: the key it is stored under, the label handed to the
/// extraction prompt, and the web search that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub query: String,
}

impl Category {
    pub fn new(key: impl Into<String>, label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    /// Used as the report file prefix, e.g. `nba_stats` -> `nba_stats_2025-03-07.json`.
    pub name: String,
    pub prompt_template: String,
    pub categories: Vec<Category>,
}

pub const NBA_STAT_CATEGORIES: &[&str] = &[
    "points",
    "rebounds",
    "assists",
    "steals",
    "blocks",
    "field_goal_percentage",
    "three_point_percentage",
    "free_throw_percentage",
    "plus_minus",
];

const NBA_EXTRACTION_PROMPT: &str = "\
You are tasked with extracting NBA statistics from search results.
Search Results: {search_results}

Please extract the following statistics for the most recent games:
1. Team names
2. Final scores
3. Date of the game
4. Leading scorers and their points
5. Any {stat_category} leaders mentioned

Return the data in a structured JSON format with game date, teams, scores, and player statistics.
For game results use the fields date, home_team, away_team, home_score, away_score and leading_scorer.
Only include factual information directly from the search results. If certain statistics aren't
available, omit them rather than making assumptions. Respond with the JSON value only.
";

const TICKER_EXTRACTION_PROMPT: &str = "\
You are tasked with identifying stock ticker symbols from search results.
Search Results: {search_results}

Identify the ticker symbol for the company \"{stat_category}\".
Return a JSON object with the fields company, ticker and exchange.
Only use information directly from the search results. If the ticker cannot be
determined, return an empty JSON object. Respond with the JSON value only.
";

impl Catalog {
    /// Recent game results first, then one category per stat leader board.
    pub fn nba() -> Self {
        let mut categories = vec![Category::new(
            "games",
            "general",
            "latest NBA scores results today",
        )];
        categories.extend(NBA_STAT_CATEGORIES.iter().map(|stat| {
            Category::new(
                *stat,
                *stat,
                format!("latest NBA {stat} leaders statistics today"),
            )
        }));

        Self {
            name: "nba_stats".to_string(),
            prompt_template: NBA_EXTRACTION_PROMPT.to_string(),
            categories,
        }
    }

    /// One category per company name.
    pub fn tickers<S: AsRef<str>>(companies: &[S]) -> Self {
        let categories = companies
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(|company| {
                Category::new(company, company, format!("{company} stock ticker symbol"))
            })
            .collect();

        Self {
            name: "tickers".to_string(),
            prompt_template: TICKER_EXTRACTION_PROMPT.to_string(),
            categories,
        }
    }

    pub fn render_prompt(&self, search_results: &str, category: &Category) -> String {
        self.prompt_template
            .replace("{stat_category}", &category.label)
            .replace("{search_results}", search_results)
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }
}
