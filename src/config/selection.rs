use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    Elite,
    Tournament,
    Roulette,
}

/// How raw fitness is turned into roulette-wheel weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelWeighting {
    Softmax,
    Linear,
    Power,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub method: SelectionMethod,
    /// Fraction of the population target size that survives selection.
    pub selection_ratio: f64,
    pub tournament_size: usize,
    pub wheel_weighting: WheelWeighting,
    /// Exponent applied by `WheelWeighting::Power`.
    pub wheel_power: u32,
    /// Re-insert the incumbent best when selection dropped it.
    pub keep_best: bool,
    pub allow_invalid: bool,
    pub allow_duplicates: bool,
    /// Attempts per slot before the draw is abandoned with a warning.
    pub max_retries: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            method: SelectionMethod::Tournament,
            selection_ratio: 0.3,
            tournament_size: 4,
            wheel_weighting: WheelWeighting::Softmax,
            wheel_power: 3,
            keep_best: true,
            allow_invalid: false,
            allow_duplicates: true,
            max_retries: 10,
        }
    }
}

impl ConfigSection for SelectionConfig {
    fn section_name() -> &'static str {
        "selection"
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.selection_ratio) || self.selection_ratio == 0.0 {
            return Err(MendelError::Configuration(
                "selection_ratio must be in (0, 1]".to_string(),
            ));
        }
        if self.method == SelectionMethod::Tournament && self.tournament_size == 0 {
            return Err(MendelError::Configuration(
                "tournament_size must be at least 1".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(MendelError::Configuration(
                "max_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
