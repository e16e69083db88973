use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

/// Repeat-probability decay when an individual may mutate more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// At most one application per individual.
    Once,
    /// Each round multiplies the probability by the original rate.
    Times,
    /// Each round squares the probability.
    Squared,
    /// The probability stays flat between rounds.
    Linear,
}

impl RepeatMode {
    /// Probability of the next round given the current one.
    pub fn decay(&self, current: f64, original: f64) -> f64 {
        match self {
            RepeatMode::Once => 0.0,
            RepeatMode::Times => current * original,
            RepeatMode::Squared => current * current,
            RepeatMode::Linear => current,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationConfig {
    /// Probability that an individual becomes a crossover parent.
    pub crossover_rate: f64,
    /// Cut points used by multi-point crossover.
    pub crossover_points: usize,
    /// Probability that an individual enters the mutation loop.
    pub mutation_rate: f64,
    pub repeat_mode: RepeatMode,
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self {
            crossover_rate: 0.35,
            crossover_points: 2,
            mutation_rate: 0.3,
            repeat_mode: RepeatMode::Times,
        }
    }
}

impl ConfigSection for VariationConfig {
    fn section_name() -> &'static str {
        "variation"
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(MendelError::Configuration(
                "crossover_rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(MendelError::Configuration(
                "mutation_rate must be between 0 and 1".to_string(),
            ));
        }
        if self.repeat_mode == RepeatMode::Linear && self.mutation_rate >= 1.0 {
            return Err(MendelError::Configuration(
                "mutation_rate must stay below 1 with a flat repeat mode".to_string(),
            ));
        }
        if self.crossover_points == 0 {
            return Err(MendelError::Configuration(
                "crossover_points must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
