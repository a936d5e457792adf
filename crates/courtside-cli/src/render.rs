//! Plain-text views of a stats report.

use courtside_core::stats::{display_value, CategoryFailure, GameLine, SavedFiles, StatsReport};

const RULE: &str = "--------------------------------------------------";

pub fn recent_results(report: &StatsReport) -> String {
    let games: Vec<GameLine> = report
        .rows("games")
        .iter()
        .filter_map(GameLine::from_value)
        .collect();

    if games.is_empty() {
        return "No recent game data available".to_string();
    }

    let mut out = String::from("\n===== RECENT NBA GAME RESULTS =====");
    for game in games {
        out.push_str(&format!(
            "\n\n{} - {} vs {}\nScore: {} - {}",
            game.date, game.home_team, game.away_team, game.home_score, game.away_score
        ));
        if let Some(scorer) = game.leading_scorer {
            out.push_str(&format!("\nLeading Scorer: {scorer}"));
        }
    }
    out
}

pub fn category_view(report: &StatsReport, category: &str) -> String {
    if report.get(category).is_none() {
        return format!("No data available for {category}");
    }

    let mut out = format!("\n===== {} LEADERS =====", category.to_uppercase());
    for row in report.rows(category) {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(&row).unwrap_or_else(|_| row.to_string()));
    }
    out
}

pub fn failure_diagnostic(failure: &CategoryFailure) -> String {
    let mut out = format!(
        "Error fetching {} data. Skipping this category.\n{RULE}\nERROR: {}",
        failure.category, failure.reason
    );
    if let Some(raw) = &failure.raw_output {
        out.push_str(&format!("\nEXTRACTION RESULT: {raw}"));
    }
    out.push('\n');
    out.push_str(RULE);
    out
}

pub fn saved_files(saved: &SavedFiles) -> String {
    let mut out = format!("Statistics saved to {}", saved.report.display());
    if let Some(csv) = &saved.points_csv {
        out.push_str(&format!("\nPoints leaders exported to {}", csv.display()));
    }
    out
}

/// One line per company: `Apple: AAPL (NASDAQ)`.
pub fn ticker_table(report: &StatsReport) -> String {
    report
        .categories
        .iter()
        .map(|(company, value)| {
            let ticker = value.get("ticker").map(display_value);
            let exchange = value.get("exchange").map(display_value);
            match (ticker, exchange) {
                (Some(t), Some(e)) => format!("{company}: {t} ({e})"),
                (Some(t), None) => format!("{company}: {t}"),
                _ => format!("{company}: not found"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
