use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_generations: u32,
    /// Wall-clock budget for a run; `None` means unlimited.
    pub timeout_secs: Option<f64>,
    /// Fixed RNG seed. `None` draws one from entropy; the drawn seed is
    /// still stored in the run record so the run can be replayed.
    pub seed: Option<u64>,
    /// Evaluate the population with rayon instead of sequentially.
    pub parallel_eval: bool,
    /// Capacity of the best-ever archive.
    pub hall_of_fame_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            timeout_secs: None,
            seed: None,
            parallel_eval: true,
            hall_of_fame_size: 10,
        }
    }
}

impl ConfigSection for EngineConfig {
    fn section_name() -> &'static str {
        "engine"
    }

    fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(MendelError::Configuration(
                "max_generations must be at least 1".to_string(),
            ));
        }
        if let Some(timeout) = self.timeout_secs {
            if timeout <= 0.0 {
                return Err(MendelError::Configuration(
                    "timeout_secs must be positive when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}
