//! Best-run records
//!
//! Three scalar bests merged at game over. Storage is best effort: a missing
//! or corrupt file means zeroed records, and a failed save is only logged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistResult;

/// Default file name next to the working directory
pub const RECORDS_FILE: &str = "arena_survivor_records.json";

/// Best survival time, kill count and level across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestRecords {
    /// Seconds survived
    pub best_time: f32,
    pub best_kills: u32,
    pub best_level: u32,
}

impl BestRecords {
    /// Fold a finished run in. Each field improves independently; returns
    /// true if any of them did.
    pub fn merge(&mut self, time: f32, kills: u32, level: u32) -> bool {
        let mut improved = false;
        if time > self.best_time {
            self.best_time = time;
            improved = true;
        }
        if kills > self.best_kills {
            self.best_kills = kills;
            improved = true;
        }
        if level > self.best_level {
            self.best_level = level;
            improved = true;
        }
        improved
    }

    /// Drop values a hand-edited file could smuggle in
    fn sanitized(mut self) -> Self {
        if !self.best_time.is_finite() || self.best_time < 0.0 {
            self.best_time = 0.0;
        }
        self
    }
}

/// Somewhere records can be loaded from and saved to
pub trait RecordStore {
    fn load(&self) -> PersistResult<BestRecords>;
    fn save(&self, records: &BestRecords) -> PersistResult<()>;

    /// Load, falling back to zeroed records on any failure
    fn load_or_default(&self) -> BestRecords {
        match self.load() {
            Ok(records) => {
                log::info!(
                    "Loaded records: {:.1}s, {} kills, level {}",
                    records.best_time,
                    records.best_kills,
                    records.best_level
                );
                records
            }
            Err(e) => {
                log::warn!("Records unavailable ({}), starting fresh", e);
                BestRecords::default()
            }
        }
    }

    /// Save, logging instead of failing
    fn save_best_effort(&self, records: &BestRecords) {
        match self.save(records) {
            Ok(()) => log::info!("Records saved"),
            Err(e) => log::warn!("Failed to save records: {}", e),
        }
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(RECORDS_FILE)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> PersistResult<BestRecords> {
        let json = fs::read_to_string(&self.path)?;
        let records: BestRecords = serde_json::from_str(&json)?;
        Ok(records.sanitized())
    }

    fn save(&self, records: &BestRecords) -> PersistResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
