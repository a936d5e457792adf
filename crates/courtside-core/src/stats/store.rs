use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::paths;
use crate::error::{CourtsideError, Result};
use crate::stats::{display_value, StatsReport};

/// Where a save landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub report: PathBuf,
    pub points_csv: Option<PathBuf>,
}

/// Writes date-stamped reports under one directory.
pub struct StatsStore {
    base_dir: PathBuf,
}

impl StatsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn report_path(&self, name: &str, date: NaiveDate) -> PathBuf {
        self.base_dir
            .join(format!("{}_{}.json", name, date.format(paths::DATE_FORMAT)))
    }

    pub fn points_csv_path(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(format!(
            "{}{}.csv",
            paths::POINTS_CSV_PREFIX,
            date.format(paths::DATE_FORMAT)
        ))
    }

    /// Write the JSON report, and the points CSV when there are points rows.
    ///
    /// A CSV failure is logged and leaves `points_csv` empty; it does not fail the save.
    pub fn save(&self, report: &StatsReport) -> Result<SavedFiles> {
        fs::create_dir_all(&self.base_dir)?;

        let report_path = self.report_path(&report.name, report.date);
        let contents = serde_json::to_string_pretty(&report.to_json())?;
        let tmp_path = report_path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &report_path)?;
        tracing::info!("Saved report to {}", report_path.display());

        let mut points_csv = None;
        if report.has_data("points") {
            let csv_path = self.points_csv_path(report.date);
            match write_rows_csv(&csv_path, &report.rows("points")) {
                Ok(()) => points_csv = Some(csv_path),
                Err(e) => tracing::warn!("Error creating CSV for points leaders: {}", e),
            }
        }

        Ok(SavedFiles {
            report: report_path,
            points_csv,
        })
    }

    pub fn load(&self, name: &str, date: NaiveDate) -> Result<StatsReport> {
        let path = self.report_path(name, date);
        let contents = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&contents)?;
        StatsReport::from_json(name, date, value).ok_or_else(|| {
            CourtsideError::Other(format!("{} is not a JSON object", path.display()))
        })
    }
}

/// Columns are the union of object keys in first-seen order. Non-object rows
/// land in a `value` column; nested values are written as compact JSON.
pub fn write_rows_csv(path: &Path, rows: &[Value]) -> Result<()> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        match row {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => {
                if !columns.iter().any(|c| c == "value") {
                    columns.push("value".to_string());
                }
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match row {
                Value::Object(map) => map.get(column).map(display_value).unwrap_or_default(),
                other if column == "value" => display_value(other),
                _ => String::new(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
