use super::ConfigSection;
use crate::error::{MendelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeatConfig {
    // Structural mutation probabilities, each tried independently per pass.
    pub add_connection_prob: f64,
    pub del_connection_prob: f64,
    pub add_node_prob: f64,
    pub del_node_prob: f64,
    pub toggle_connection_prob: f64,

    // Weight mutation.
    pub weight_mutation_prob: f64,
    pub reset_weight_prob: f64,
    pub weight_mutation_power: f64,
    pub weight_init_std: f64,
    pub weight_min: f64,
    pub weight_max: f64,

    // Crossover.
    pub disable_inheritance_prob: f64,

    // Speciation.
    pub compatibility_threshold: f64,
    pub excess_coeff: f64,
    pub disjoint_coeff: f64,
    pub weight_coeff: f64,
    pub threshold_step: f64,
    pub target_species: usize,
    pub max_stagnation: u32,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            add_connection_prob: 0.2,
            del_connection_prob: 0.1,
            add_node_prob: 0.1,
            del_node_prob: 0.05,
            toggle_connection_prob: 0.05,
            weight_mutation_prob: 0.8,
            reset_weight_prob: 0.1,
            weight_mutation_power: 0.5,
            weight_init_std: 1.0,
            weight_min: -8.0,
            weight_max: 8.0,
            disable_inheritance_prob: 0.75,
            compatibility_threshold: 3.0,
            excess_coeff: 1.0,
            disjoint_coeff: 1.0,
            weight_coeff: 0.4,
            threshold_step: 0.3,
            target_species: 10,
            max_stagnation: 15,
        }
    }
}

impl ConfigSection for NeatConfig {
    fn section_name() -> &'static str {
        "neat"
    }

    fn validate(&self) -> Result<()> {
        let probs = [
            ("add_connection_prob", self.add_connection_prob),
            ("del_connection_prob", self.del_connection_prob),
            ("add_node_prob", self.add_node_prob),
            ("del_node_prob", self.del_node_prob),
            ("toggle_connection_prob", self.toggle_connection_prob),
            ("weight_mutation_prob", self.weight_mutation_prob),
            ("reset_weight_prob", self.reset_weight_prob),
            ("disable_inheritance_prob", self.disable_inheritance_prob),
        ];
        for (name, value) in probs {
            if !(0.0..=1.0).contains(&value) {
                return Err(MendelError::Configuration(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }
        if !self.weight_init_std.is_finite() || self.weight_init_std < 0.0 {
            return Err(MendelError::Configuration(
                "weight_init_std must be finite and non-negative".to_string(),
            ));
        }
        if !self.weight_mutation_power.is_finite() || self.weight_mutation_power < 0.0 {
            return Err(MendelError::Configuration(
                "weight_mutation_power must be finite and non-negative".to_string(),
            ));
        }
        if self.weight_min >= self.weight_max {
            return Err(MendelError::Configuration(
                "weight_min must be below weight_max".to_string(),
            ));
        }
        if self.compatibility_threshold <= 0.0 {
            return Err(MendelError::Configuration(
                "compatibility_threshold must be positive".to_string(),
            ));
        }
        if self.target_species == 0 {
            return Err(MendelError::Configuration(
                "target_species must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
