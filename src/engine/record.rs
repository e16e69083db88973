use super::report::RunSummary;
use super::tuning::TuningTrace;
use crate::config::MendelConfig;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to reproduce a run: the config snapshot, the actual
/// seed, and the tuning trace. Stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub created_at: String,
    pub seed: u64,
    pub config: MendelConfig,
    pub trace: TuningTrace,
    pub generations_run: u32,
    pub best_fitness: Option<f64>,
}

impl RunRecord {
    pub fn from_summary(summary: &RunSummary, config: &MendelConfig) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            seed: summary.seed,
            config: config.clone(),
            trace: summary.trace.clone(),
            generations_run: summary.generations_run,
            best_fitness: summary.best_fitness,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .map_err(|e| MendelError::Record(format!("Failed to write record: {e}")))?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| MendelError::Record(format!("Failed to read record: {e}")))?;
        let record: RunRecord = serde_json::from_str(&contents)?;
        Ok(record)
    }

    /// Config with the recorded seed pinned, ready for a replay run.
    pub fn replay_config(&self) -> MendelConfig {
        let mut config = self.config.clone();
        config.engine.seed = Some(self.seed);
        config
    }
}
