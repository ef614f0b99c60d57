use crate::import::ImportResult;
use crate::progress::StatusThresholds;
use crate::week::DEFAULT_WEEK_START;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Tunable policy of the progress engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressConfig {
    pub thresholds: StatusThresholds,
    pub week_starts_on: Weekday,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            thresholds: StatusThresholds::default(),
            week_starts_on: DEFAULT_WEEK_START,
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> ImportResult<ProgressConfig> {
    let file = File::open(path.as_ref())?;
    // threshold bands are checked while deserializing
    let config: ProgressConfig = serde_json::from_reader(file)?;
    tracing::debug!(path = %path.as_ref().display(), ?config, "loaded progress config");
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &ProgressConfig, path: P) -> ImportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}
