use std::path::PathBuf;

use crate::stats::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::storage::SqliteStorage;

/// Key the whole collection is stored under.
pub const STORAGE_KEY: &str = "jobApplications";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub window_days: u32,
}

impl Config {
    pub fn resolve(db_path: Option<PathBuf>, window_days: Option<u32>) -> Self {
        Self {
            db_path: db_path.unwrap_or_else(SqliteStorage::default_path),
            storage_key: STORAGE_KEY.to_string(),
            window_days: window_days
                .unwrap_or(DEFAULT_WINDOW_DAYS)
                .clamp(1, MAX_WINDOW_DAYS),
        }
    }

    /// `orbit.log` beside the database.
    pub fn log_path(&self) -> PathBuf {
        self.db_path.with_file_name("orbit.log")
    }
}
