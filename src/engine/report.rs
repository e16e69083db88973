use super::tuning::TuningTrace;
use serde::{Deserialize, Serialize};

/// Snapshot of one completed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub elapsed_secs: f64,
    /// Best fitness ever archived.
    pub best_ever: Option<f64>,
    /// Best valid fitness currently in the population.
    pub population_best: Option<f64>,
    pub population_mean: Option<f64>,
    pub population_size: usize,
    pub valid: usize,
    pub immigrated: usize,
    pub crossed: usize,
    pub mutated: usize,
    pub mutation_applications: usize,
    pub evaluated: usize,
}

impl GenerationReport {
    pub fn one_line(&self) -> String {
        let fmt = |v: Option<f64>| v.map(|f| format!("{f:.4}")).unwrap_or_else(|| "-".into());
        format!(
            "gen {:>4}  top {}  pop {}  mean {}  size {:>4}  immi {:>3}  cros {:>3}  mut {:>3}  eval {:>4}",
            self.generation,
            fmt(self.best_ever),
            fmt(self.population_best),
            fmt(self.population_mean),
            self.population_size,
            self.immigrated,
            self.crossed,
            self.mutated,
            self.evaluated,
        )
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generations_run: u32,
    pub elapsed_secs: f64,
    pub best_fitness: Option<f64>,
    pub best_description: Option<String>,
    pub seed: u64,
    pub reports: Vec<GenerationReport>,
    pub trace: TuningTrace,
}
