use super::progress::ProgressCallback;
use super::report::{GenerationReport, RunSummary};
use super::tuning::{EngineControl, TraceEntry, TunableParam, TuningTrace};
use crate::config::MendelConfig;
use crate::error::Result;
use crate::eval::{evaluate_population, Evaluator};
use crate::genome::{Genome, Sampler};
use crate::ops::{cross_population, mutate_population, selector_from_config, Crossover, Mutation, Selector};
use crate::population::{HallEntry, HallOfFame, Individual, Population};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

/// Owns one evolving population together with its operators, evaluator,
/// archive, and seeded RNG, and drives the generation loop:
/// select, immigrate, cross, mutate, refill, evaluate, archive.
pub struct Environment<G: Genome> {
    config: MendelConfig,
    population: Population<G>,
    selector: Box<dyn Selector<G>>,
    crossover: Box<dyn Crossover<G>>,
    mutation: Box<dyn Mutation<G>>,
    evaluator: Arc<dyn Evaluator<G>>,
    hall: HallOfFame<G>,
    rng: StdRng,
    control: EngineControl,
    trace: TuningTrace,
    replay: Vec<TraceEntry>,
    reports: Vec<GenerationReport>,
    generation: u32,
    seed: u64,
    started_at: Instant,

    // Live-tunable copies of the variation settings.
    crossover_rate: f64,
    mutation_rate: f64,
}

impl<G: Genome> Environment<G> {
    pub fn new(
        config: MendelConfig,
        sampler: Arc<dyn Sampler<G>>,
        crossover: Box<dyn Crossover<G>>,
        mutation: Box<dyn Mutation<G>>,
        evaluator: Arc<dyn Evaluator<G>>,
    ) -> Result<Self> {
        config.validate()?;

        let seed = config.engine.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let population = Population::new(sampler, &config.population, &mut rng);
        let selector = selector_from_config(&config.selection);
        let hall = HallOfFame::new(config.engine.hall_of_fame_size, config.population.direction);

        Ok(Self {
            crossover_rate: config.variation.crossover_rate,
            mutation_rate: config.variation.mutation_rate,
            config,
            population,
            selector,
            crossover,
            mutation,
            evaluator,
            hall,
            rng,
            control: EngineControl::new(),
            trace: TuningTrace::default(),
            replay: Vec::new(),
            reports: Vec::new(),
            generation: 0,
            seed,
            started_at: Instant::now(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn config(&self) -> &MendelConfig {
        &self.config
    }

    pub fn population(&self) -> &Population<G> {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population<G> {
        &mut self.population
    }

    pub fn hall_of_fame(&self) -> &HallOfFame<G> {
        &self.hall
    }

    pub fn trace(&self) -> &TuningTrace {
        &self.trace
    }

    /// Handle for cancelling the run or queueing parameter updates from
    /// another thread.
    pub fn control(&self) -> EngineControl {
        self.control.clone()
    }

    /// Adopt an externally created control handle, e.g. one the UI keeps
    /// while the environment moves into a worker thread.
    pub fn set_control(&mut self, control: EngineControl) {
        self.control = control;
    }

    /// Swap in a custom selector, e.g. a speciated one for graph genomes.
    pub fn set_selector(&mut self, selector: Box<dyn Selector<G>>) {
        self.selector = selector;
    }

    /// Schedule a recorded tuning trace: its updates re-apply at the
    /// generations they originally took effect in.
    pub fn schedule_replay(&mut self, trace: &TuningTrace) {
        self.replay = trace.updates.clone();
    }

    /// Clones of the current top `n` individuals, for island exchanges.
    pub fn top_clones(&self, n: usize) -> Vec<Individual<G>> {
        self.population
            .top_indices(n)
            .into_iter()
            .map(|idx| self.population.get(idx).clone())
            .filter(|ind| ind.is_valid())
            .collect()
    }

    /// Run the full evolution loop.
    pub fn run(&mut self, callback: &mut dyn ProgressCallback) -> Result<RunSummary> {
        self.started_at = Instant::now();
        info!(
            "starting evolution: seed {}, population {}, {} generations max",
            self.seed,
            self.population.target_size(),
            self.config.engine.max_generations,
        );

        self.prime();

        for _ in 0..self.config.engine.max_generations {
            if self.control.is_cancelled() {
                info!("evolution cancelled at generation {}", self.generation);
                break;
            }
            if self.timed_out() {
                info!("evolution timed out at generation {}", self.generation);
                break;
            }
            callback.on_generation_start(self.generation + 1);
            let report = self.step()?;
            callback.on_generation_complete(&report);
        }

        let summary = self.summary();
        info!(
            "evolution finished: {} generations, best {:?}",
            summary.generations_run, summary.best_fitness
        );
        callback.on_run_complete(&summary);
        Ok(summary)
    }

    /// Generation zero: score the initial population. Idempotent, and
    /// required before the first `step` when driving the loop manually.
    pub fn prime(&mut self) {
        self.population.refill(self.generation, &mut self.rng);
        evaluate_population(
            self.evaluator.as_ref(),
            &mut self.population,
            self.config.engine.parallel_eval,
        );
        self.hall.update_from(&self.population, self.generation);
    }

    /// Advance one generation. Public so island models can interleave
    /// stepping with migration.
    pub fn step(&mut self) -> Result<GenerationReport> {
        self.generation += 1;
        self.apply_pending_updates();

        let survivors = self.selector.select(&self.population, &mut self.rng)?;
        self.population.replace_with(survivors);

        let immigrated = self.population.immigrate(self.generation, &mut self.rng);
        let crossed = cross_population(
            &*self.crossover,
            &mut self.population,
            self.crossover_rate,
            self.generation,
            &mut self.rng,
        );
        let stats = mutate_population(
            &mut *self.mutation,
            &mut self.population,
            self.mutation_rate,
            self.config.variation.repeat_mode,
            &mut self.rng,
        );
        self.population.refill(self.generation, &mut self.rng);
        let evaluated = evaluate_population(
            self.evaluator.as_ref(),
            &mut self.population,
            self.config.engine.parallel_eval,
        );
        self.hall.update_from(&self.population, self.generation);

        let report = GenerationReport {
            generation: self.generation,
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
            best_ever: self.hall.best().map(|entry| entry.fitness),
            population_best: self.population.best().and_then(|ind| ind.fitness()),
            population_mean: self.population.mean_fitness(),
            population_size: self.population.len(),
            valid: self.population.count_valid(),
            immigrated,
            crossed,
            mutated: stats.individuals,
            mutation_applications: stats.applications,
            evaluated,
        };
        info!("{}", report.one_line());
        self.reports.push(report.clone());
        Ok(report)
    }

    pub fn summary(&self) -> RunSummary {
        let best = self.hall.best();
        RunSummary {
            generations_run: self.generation,
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
            best_fitness: best.map(|entry| entry.fitness),
            best_description: best.map(|entry| entry.genome.describe()),
            seed: self.seed,
            reports: self.reports.clone(),
            trace: self.trace.clone(),
        }
    }

    pub fn best_entry(&self) -> Option<&HallEntry<G>> {
        self.hall.best()
    }

    fn timed_out(&self) -> bool {
        match self.config.engine.timeout_secs {
            Some(limit) => self.started_at.elapsed().as_secs_f64() > limit,
            None => false,
        }
    }

    fn apply_pending_updates(&mut self) {
        let scripted: Vec<TraceEntry> = self
            .replay
            .iter()
            .filter(|entry| entry.generation == self.generation)
            .cloned()
            .collect();
        for entry in scripted {
            self.apply_update(entry.param, entry.value);
        }
        for (param, value) in self.control.drain() {
            self.apply_update(param, value);
        }
    }

    fn apply_update(&mut self, param: TunableParam, value: f64) {
        match param {
            TunableParam::MutationRate => self.mutation_rate = value.clamp(0.0, 1.0),
            TunableParam::CrossoverRate => self.crossover_rate = value.clamp(0.0, 1.0),
            TunableParam::ImmigrationRate => self.population.set_immigration_rate(value),
            TunableParam::SelectionRatio => self.selector.set_selection_ratio(value),
        }
        info!(
            "parameter {} set to {value} at generation {}",
            param.label(),
            self.generation
        );
        self.trace.push(self.generation, param, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationDirection;
    use crate::engine::progress::SilentProgress;
    use crate::eval::SubsetSplitEvaluator;
    use crate::genome::{BitString, BitStringSpec};
    use crate::ops::{FlipMutation, MultiPointCrossover};

    fn subset_environment(seed: u64, generations: u32) -> Environment<BitString> {
        let mut config = MendelConfig::default();
        config.engine.seed = Some(seed);
        config.engine.max_generations = generations;
        config.engine.parallel_eval = false;
        config.population.size = 60;
        config.population.direction = OptimizationDirection::Minimize;

        let mut weight_rng = StdRng::seed_from_u64(1000 + seed);
        let evaluator = SubsetSplitEvaluator::random(32, &mut weight_rng);

        Environment::new(
            config,
            Arc::new(BitStringSpec::new(32)),
            Box::new(MultiPointCrossover::new(2)),
            Box::new(FlipMutation),
            Arc::new(evaluator),
        )
        .unwrap()
    }

    #[test]
    fn evolution_improves_subset_balance() {
        let mut env = subset_environment(7, 40);
        let summary = env.run(&mut SilentProgress).unwrap();
        let first = summary.reports.first().unwrap();
        let best = summary.best_fitness.unwrap();
        assert!(best <= first.population_best.unwrap());
        assert!(best < 0.1, "expected a near-balanced split, got {best}");
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let run_a = subset_environment(21, 15).run(&mut SilentProgress).unwrap();
        let run_b = subset_environment(21, 15).run(&mut SilentProgress).unwrap();
        assert_eq!(run_a.best_fitness, run_b.best_fitness);
        let bests_a: Vec<_> = run_a.reports.iter().map(|r| r.population_best).collect();
        let bests_b: Vec<_> = run_b.reports.iter().map(|r| r.population_best).collect();
        assert_eq!(bests_a, bests_b);
    }

    #[test]
    fn queued_updates_land_in_the_trace() {
        let mut env = subset_environment(3, 5);
        let control = env.control();
        control.queue_update(TunableParam::MutationRate, 0.9);
        let summary = env.run(&mut SilentProgress).unwrap();
        assert_eq!(summary.trace.updates.len(), 1);
        let entry = summary.trace.updates[0];
        assert_eq!(entry.param, TunableParam::MutationRate);
        assert_eq!(entry.value, 0.9);
        assert_eq!(entry.generation, 1);
    }

    #[test]
    fn replayed_trace_reproduces_a_tuned_run() {
        let mut tuned = subset_environment(5, 12);
        let control = tuned.control();
        control.queue_update(TunableParam::MutationRate, 0.8);
        control.queue_update(TunableParam::CrossoverRate, 0.6);
        let tuned_summary = tuned.run(&mut SilentProgress).unwrap();

        let mut replayed = subset_environment(5, 12);
        replayed.schedule_replay(&tuned_summary.trace);
        let replay_summary = replayed.run(&mut SilentProgress).unwrap();

        assert_eq!(tuned_summary.best_fitness, replay_summary.best_fitness);
        assert_eq!(tuned_summary.trace.updates, replay_summary.trace.updates);
        let bests_a: Vec<_> = tuned_summary
            .reports
            .iter()
            .map(|r| r.population_best)
            .collect();
        let bests_b: Vec<_> = replay_summary
            .reports
            .iter()
            .map(|r| r.population_best)
            .collect();
        assert_eq!(bests_a, bests_b);
    }

    #[test]
    fn cancellation_stops_the_loop_early() {
        let mut env = subset_environment(9, 500);
        env.control().cancel();
        let summary = env.run(&mut SilentProgress).unwrap();
        assert_eq!(summary.generations_run, 0);
    }
}
