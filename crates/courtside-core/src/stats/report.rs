use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// A category that came back empty, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFailure {
    pub category: String,
    pub reason: String,
    /// The model output that failed to parse, when there was one.
    pub raw_output: Option<String>,
}

/// The aggregate result of one fetch run, keyed by category.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub name: String,
    pub date: NaiveDate,
    pub categories: BTreeMap<String, Value>,
    pub failures: Vec<CategoryFailure>,
}

impl StatsReport {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            categories: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn insert(&mut self, category: impl Into<String>, value: Value) {
        self.categories.insert(category.into(), value);
    }

    /// Record a failed category; it is stored as an empty list.
    pub fn insert_failure(&mut self, failure: CategoryFailure) {
        self.categories
            .insert(failure.category.clone(), Value::Array(Vec::new()));
        self.failures.push(failure);
    }

    pub fn get(&self, category: &str) -> Option<&Value> {
        self.categories.get(category)
    }

    /// Present and not an empty list, object, string or null.
    pub fn has_data(&self, category: &str) -> bool {
        match self.categories.get(category) {
            None | Some(Value::Null) => false,
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// The persisted form: a JSON object keyed by category.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.categories
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn from_json(name: impl Into<String>, date: NaiveDate, value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let mut report = Self::new(name, date);
        report.categories = map.into_iter().collect();
        Some(report)
    }

    /// Rows of a category as a list: arrays as-is, a lone object as one row,
    /// an object wrapping a single array as that array.
    pub fn rows(&self, category: &str) -> Vec<Value> {
        match self.categories.get(category) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(map)) => {
                let mut arrays = map.values().filter_map(Value::as_array);
                match (arrays.next(), arrays.next()) {
                    (Some(only), None) if map.len() == 1 => only.clone(),
                    _ => vec![Value::Object(map.clone())],
                }
            }
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }

    /// A short plain-text digest, used as context for follow-up questions.
    pub fn summary(&self, max_chars: usize) -> String {
        let mut text = format!("Statistics fetched on {}:\n", self.date);
        for (category, value) in &self.categories {
            if !self.has_data(category) {
                continue;
            }
            let line = format!("{category}: {value}\n");
            if text.len() + line.len() > max_chars {
                break;
            }
            text.push_str(&line);
        }
        text.trim_end().to_string()
    }
}

/// A single game line as printed by the results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLine {
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: String,
    pub away_score: String,
    pub leading_scorer: Option<String>,
}

impl GameLine {
    pub fn from_value(value: &Value) -> Option<Self> {
        let field = |name: &str| value.get(name).map(display_value);
        Some(Self {
            date: field("date").unwrap_or_default(),
            home_team: field("home_team")?,
            away_team: field("away_team")?,
            home_score: field("home_score").unwrap_or_default(),
            away_score: field("away_score").unwrap_or_default(),
            leading_scorer: field("leading_scorer"),
        })
    }
}

/// Strings without quotes, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn failure_is_stored_as_empty_list() {
        let mut report = StatsReport::new("nba_stats", date());
        report.insert_failure(CategoryFailure {
            category: "steals".into(),
            reason: "no JSON".into(),
            raw_output: Some("sorry".into()),
        });
        assert_eq!(report.get("steals"), Some(&json!([])));
        assert!(!report.has_data("steals"));
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn rows_unwraps_single_array_object() {
        let mut report = StatsReport::new("nba_stats", date());
        report.insert("points", json!({"leaders": [{"player": "A"}, {"player": "B"}]}));
        report.insert("games", json!({"date": "2025-03-06", "home_team": "BOS"}));
        assert_eq!(report.rows("points").len(), 2);
        assert_eq!(report.rows("games").len(), 1);
        assert!(report.rows("missing").is_empty());
    }

    #[test]
    fn game_line_requires_teams() {
        let line = GameLine::from_value(&json!({
            "date": "2025-03-06", "home_team": "Lakers", "away_team": "Celtics",
            "home_score": 110, "away_score": 102
        }))
        .unwrap();
        assert_eq!(line.home_score, "110");
        assert!(line.leading_scorer.is_none());
        assert!(GameLine::from_value(&json!({"date": "x"})).is_none());
    }

    #[test]
    fn summary_skips_empty_categories_and_respects_limit() {
        let mut report = StatsReport::new("nba_stats", date());
        report.insert("assists", json!([{"player": "Haliburton"}]));
        report.insert("blocks", json!([]));
        let summary = report.summary(1000);
        assert!(summary.starts_with("Statistics fetched on 2025-03-07:"));
        assert!(summary.contains("assists"));
        assert!(!summary.contains("blocks"));

        assert_eq!(report.summary(10), "Statistics fetched on 2025-03-07:");
    }
}
