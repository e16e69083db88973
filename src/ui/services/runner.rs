use crate::config::MendelConfig;
use crate::engine::{
    ChannelProgress, EngineControl, Environment, ProgressUpdate, RunSummary, TunableParam,
};
use crate::eval::{rastrigin, FunctionEvaluator, SalesmanEvaluator, SubsetSplitEvaluator};
use crate::genome::{BitStringSpec, ChainSpec, Genome, PermutationSpec};
use crate::ops::{
    FlipMutation, MultiPointCrossover, PermutationMutation, PmxCrossover, ResetMutation,
};
use crate::ui::state::{DemoProblem, HallDisplay};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Everything the worker thread needs to set up a run.
#[derive(Clone)]
pub struct RunParams {
    pub problem: DemoProblem,
    pub problem_size: usize,
    pub config: MendelConfig,
}

/// Final payload delivered when the worker thread finishes.
pub struct RunOutput {
    pub summary: RunSummary,
    pub hall: Vec<HallDisplay>,
}

pub type EvolutionOutcome = Result<RunOutput, String>;

pub struct EvolutionRunner {
    handle: Option<JoinHandle<EvolutionOutcome>>,
    progress_rx: Option<Receiver<ProgressUpdate>>,
    control: EngineControl,
}

impl EvolutionRunner {
    /// Start evolution in a background thread.
    pub fn start(params: RunParams) -> Self {
        let (progress_tx, progress_rx) = channel();
        let control = EngineControl::new();
        let control_clone = control.clone();

        let handle = thread::Builder::new()
            .name("evolution".to_string())
            .spawn(move || Self::run_evolution(params, progress_tx, control_clone))
            .expect("Failed to spawn evolution thread");

        Self {
            handle: Some(handle),
            progress_rx: Some(progress_rx),
            control,
        }
    }

    /// Poll for progress updates (non-blocking).
    pub fn poll_progress(&mut self) -> Option<ProgressUpdate> {
        if let Some(rx) = &self.progress_rx {
            rx.try_recv().ok()
        } else {
            None
        }
    }

    /// Check if evolution is complete and collect the results.
    pub fn try_get_results(&mut self) -> Option<EvolutionOutcome> {
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                match handle.join() {
                    Ok(result) => Some(result),
                    Err(_) => Some(Err("Evolution thread panicked".to_string())),
                }
            } else {
                // Not finished yet, put the handle back.
                self.handle = Some(handle);
                None
            }
        } else {
            None
        }
    }

    /// Cancel the running evolution.
    pub fn cancel(&mut self) {
        self.control.cancel();
    }

    /// Queue a live parameter update; it applies at the next generation.
    pub fn queue_update(&self, param: TunableParam, value: f64) {
        self.control.queue_update(param, value);
    }

    fn run_evolution(
        params: RunParams,
        progress_tx: Sender<ProgressUpdate>,
        control: EngineControl,
    ) -> EvolutionOutcome {
        // The problem instance uses its own seed so that re-running with a
        // fixed engine seed rebuilds the identical instance.
        let instance_seed = params.config.engine.seed.unwrap_or(0).wrapping_add(1);
        let mut instance_rng = StdRng::seed_from_u64(instance_seed);
        let size = params.problem_size.max(4);

        match params.problem {
            DemoProblem::Salesman => {
                let evaluator = SalesmanEvaluator::random(size, &mut instance_rng);
                let env = Environment::new(
                    params.config,
                    Arc::new(PermutationSpec::new(size)),
                    Box::new(PmxCrossover),
                    Box::new(PermutationMutation),
                    Arc::new(evaluator),
                );
                Self::drive(env, progress_tx, control)
            }
            DemoProblem::Rastrigin => {
                let evaluator = FunctionEvaluator::new(rastrigin);
                let env = Environment::new(
                    params.config,
                    Arc::new(ChainSpec::new(size.min(32), -5.12f64, 5.12)),
                    Box::new(MultiPointCrossover::new(2)),
                    Box::new(ResetMutation),
                    Arc::new(evaluator),
                );
                Self::drive(env, progress_tx, control)
            }
            DemoProblem::SubsetSplit => {
                let evaluator = SubsetSplitEvaluator::random(size, &mut instance_rng);
                let env = Environment::new(
                    params.config,
                    Arc::new(BitStringSpec::new(size)),
                    Box::new(MultiPointCrossover::new(2)),
                    Box::new(FlipMutation),
                    Arc::new(evaluator),
                );
                Self::drive(env, progress_tx, control)
            }
        }
    }

    fn drive<G: Genome>(
        env: crate::error::Result<Environment<G>>,
        progress_tx: Sender<ProgressUpdate>,
        control: EngineControl,
    ) -> EvolutionOutcome {
        let mut env = env.map_err(|e| format!("Setup failed: {e}"))?;
        env.set_control(control);
        let mut callback = ChannelProgress::new(progress_tx);
        let summary = env
            .run(&mut callback)
            .map_err(|e| format!("Evolution failed: {e}"))?;
        let hall = env
            .hall_of_fame()
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| HallDisplay {
                rank: idx + 1,
                fitness: entry.fitness,
                generation: entry.generation,
                description: entry.genome.describe(),
            })
            .collect();
        Ok(RunOutput { summary, hall })
    }
}

impl Drop for EvolutionRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
