use crate::config::{
    MendelConfig, OptimizationDirection, SelectionMethod, WheelWeighting,
};
use crate::engine::{GenerationReport, RunSummary, TunableParam};

/// Demo problems runnable from the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoProblem {
    Salesman,
    Rastrigin,
    SubsetSplit,
}

impl DemoProblem {
    pub fn label(&self) -> &'static str {
        match self {
            DemoProblem::Salesman => "Traveling Salesman",
            DemoProblem::Rastrigin => "Rastrigin Function",
            DemoProblem::SubsetSplit => "Subset Split",
        }
    }
}

/// Central application state for the UI
pub struct AppState {
    // Problem Configuration
    pub problem: DemoProblem,
    pub problem_size: usize,

    // Evolution Configuration
    pub population_size: usize,
    pub num_generations: u32,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub immigration_rate: f64,
    pub selection_method: SelectionMethod,
    pub selection_ratio: f64,
    pub tournament_size: usize,
    pub use_fixed_seed: bool,
    pub seed: u64,

    // Execution State
    pub is_running: bool,
    pub start_requested: bool,
    pub stop_requested: bool,
    pub current_generation: u32,
    pub status_message: String,

    // Live tuning: the values last sent to the running engine.
    pub live_mutation_rate: f64,
    pub live_crossover_rate: f64,
    pub live_immigration_rate: f64,
    pub sent_updates: Vec<(TunableParam, f64)>,

    // Results
    pub history: Vec<GenerationReport>,
    pub hall_of_fame: Vec<HallDisplay>,
    pub selected_entry_idx: Option<usize>,
    pub last_summary: Option<RunSummary>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            // Problem Configuration
            problem: DemoProblem::Salesman,
            problem_size: 30,

            // Evolution Configuration
            population_size: 200,
            num_generations: 200,
            mutation_rate: 0.3,
            crossover_rate: 0.35,
            immigration_rate: 0.1,
            selection_method: SelectionMethod::Tournament,
            selection_ratio: 0.3,
            tournament_size: 4,
            use_fixed_seed: false,
            seed: 42,

            // Execution State
            is_running: false,
            start_requested: false,
            stop_requested: false,
            current_generation: 0,
            status_message: "Ready".to_string(),

            // Live tuning
            live_mutation_rate: 0.3,
            live_crossover_rate: 0.35,
            live_immigration_rate: 0.1,
            sent_updates: Vec::new(),

            // Results
            history: Vec::new(),
            hall_of_fame: Vec::new(),
            selected_entry_idx: None,
            last_summary: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine config assembled from the panel values.
    pub fn to_config(&self) -> MendelConfig {
        let mut config = MendelConfig::default();
        config.engine.max_generations = self.num_generations;
        config.engine.seed = self.use_fixed_seed.then_some(self.seed);
        config.population.size = self.population_size;
        config.population.immigration_rate = self.immigration_rate;
        config.population.direction = OptimizationDirection::Minimize;
        config.selection.method = self.selection_method;
        config.selection.selection_ratio = self.selection_ratio;
        config.selection.tournament_size = self.tournament_size;
        config.selection.wheel_weighting = WheelWeighting::Softmax;
        config.variation.crossover_rate = self.crossover_rate;
        config.variation.mutation_rate = self.mutation_rate;
        config
    }

    pub fn reset_run_views(&mut self) {
        self.history.clear();
        self.hall_of_fame.clear();
        self.sent_updates.clear();
        self.selected_entry_idx = None;
        self.last_summary = None;
        self.current_generation = 0;
        self.live_mutation_rate = self.mutation_rate;
        self.live_crossover_rate = self.crossover_rate;
        self.live_immigration_rate = self.immigration_rate;
    }
}

/// Display model for a hall-of-fame row.
#[derive(Clone)]
pub struct HallDisplay {
    pub rank: usize,
    pub fitness: f64,
    pub generation: u32,
    pub description: String,
}
