mod catalog;
mod pipeline;
mod report;
mod store;

pub use catalog::{Catalog, Category, NBA_STAT_CATEGORIES};
pub use pipeline::StatsFetcher;
pub use report::{display_value, CategoryFailure, GameLine, StatsReport};
pub use store::{write_rows_csv, SavedFiles, StatsStore};
