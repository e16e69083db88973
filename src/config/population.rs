use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

/// Whether higher or lower fitness wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

impl OptimizationDirection {
    /// Sentinel used in place of a fitness for invalid individuals.
    pub fn worst(&self) -> f64 {
        match self {
            OptimizationDirection::Maximize => f64::NEG_INFINITY,
            OptimizationDirection::Minimize => f64::INFINITY,
        }
    }

    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            OptimizationDirection::Maximize => a > b,
            OptimizationDirection::Minimize => a < b,
        }
    }

    /// Best-first ordering: `Less` means `a` ranks ahead of `b`.
    pub fn rank(&self, a: f64, b: f64) -> std::cmp::Ordering {
        let ord = match self {
            OptimizationDirection::Maximize => b.partial_cmp(&a),
            OptimizationDirection::Minimize => a.partial_cmp(&b),
        };
        ord.unwrap_or(std::cmp::Ordering::Equal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub size: usize,
    /// Fraction of the population injected as random immigrants each
    /// generation.
    pub immigration_rate: f64,
    pub direction: OptimizationDirection,
    pub keep_sorted: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 200,
            immigration_rate: 0.1,
            direction: OptimizationDirection::Minimize,
            keep_sorted: true,
        }
    }
}

impl ConfigSection for PopulationConfig {
    fn section_name() -> &'static str {
        "population"
    }

    fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(MendelError::Configuration(
                "population size must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.immigration_rate) {
            return Err(MendelError::Configuration(
                "immigration_rate must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}
