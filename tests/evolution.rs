use mendel::config::{MendelConfig, OptimizationDirection, SelectionMethod};
use mendel::engine::{Environment, IslandModel, ProgressCallback, RunRecord};
use mendel::engine::progress::SilentProgress;
use mendel::engine::report::GenerationReport;
use mendel::engine::tuning::TunableParam;
use mendel::eval::{rastrigin, Evaluator, FunctionEvaluator, SalesmanEvaluator, SubsetSplitEvaluator};
use mendel::genome::{BitStringSpec, ChainSpec, Permutation, PermutationSpec};
use mendel::ops::{
    FlipMutation, MultiPointCrossover, PathMergeCrossover, PermutationMutation, PmxCrossover,
    ResetMutation,
};
use mendel::symreg::{ExprMapper, RegressionEvaluator};
use mendel::Chain;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Progress callback that remembers the reports it saw.
struct RecordingProgress {
    reports: Vec<GenerationReport>,
}

impl ProgressCallback for RecordingProgress {
    fn on_generation_complete(&mut self, report: &GenerationReport) {
        self.reports.push(report.clone());
    }
}

fn base_config(seed: u64, generations: u32, population: usize) -> MendelConfig {
    let mut config = MendelConfig::default();
    config.engine.seed = Some(seed);
    config.engine.max_generations = generations;
    config.engine.parallel_eval = false;
    config.population.size = population;
    config.population.direction = OptimizationDirection::Minimize;
    config
}

#[test]
fn tsp_run_beats_random_tours() {
    let mut rng = StdRng::seed_from_u64(2024);
    let evaluator = Arc::new(SalesmanEvaluator::random(25, &mut rng));

    // Baseline: mean length of random tours.
    let spec = PermutationSpec::new(25);
    let mut baseline = 0.0;
    for _ in 0..200 {
        use mendel::genome::Sampler;
        let tour = spec.sample(&mut rng);
        baseline += evaluator.tour_length(&tour);
    }
    baseline /= 200.0;

    struct Shared(Arc<SalesmanEvaluator>);
    impl Evaluator<Permutation> for Shared {
        fn evaluate(&self, genome: &Permutation) -> anyhow::Result<f64> {
            self.0.evaluate(genome)
        }
    }

    let mut env = Environment::new(
        base_config(11, 60, 120),
        Arc::new(PermutationSpec::new(25)),
        Box::new(PmxCrossover),
        Box::new(PermutationMutation),
        Arc::new(Shared(Arc::clone(&evaluator))),
    )
    .unwrap();

    let mut progress = RecordingProgress { reports: Vec::new() };
    let summary = env.run(&mut progress).unwrap();

    assert_eq!(progress.reports.len(), 60);
    let best = summary.best_fitness.unwrap();
    assert!(
        best < baseline * 0.8,
        "evolved tour {best:.3} should beat the random baseline {baseline:.3}"
    );

    // The best tour in the archive is a valid permutation.
    let entry = env.hall_of_fame().best().unwrap();
    let mut sorted = entry.genome.order().to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..25).collect::<Vec<_>>());
}

#[test]
fn tsp_with_path_merge_crossover_also_improves() {
    let mut rng = StdRng::seed_from_u64(501);
    let evaluator = SalesmanEvaluator::random(20, &mut rng);
    let baseline = {
        use mendel::genome::Sampler;
        let spec = PermutationSpec::new(20);
        let mut total = 0.0;
        for _ in 0..100 {
            total += evaluator.tour_length(&spec.sample(&mut rng));
        }
        total / 100.0
    };

    let mut env = Environment::new(
        base_config(31, 50, 100),
        Arc::new(PermutationSpec::new(20)),
        Box::new(PathMergeCrossover),
        Box::new(PermutationMutation),
        Arc::new(evaluator),
    )
    .unwrap();
    let summary = env.run(&mut SilentProgress).unwrap();
    assert!(summary.best_fitness.unwrap() < baseline);
}

#[test]
fn rastrigin_minimization_approaches_the_origin() {
    let evaluator = FunctionEvaluator::new(rastrigin);
    let mut env = Environment::new(
        base_config(13, 80, 150),
        Arc::new(ChainSpec::new(6, -5.12f64, 5.12)),
        Box::new(MultiPointCrossover::new(2)),
        Box::new(ResetMutation),
        Arc::new(evaluator),
    )
    .unwrap();
    let summary = env.run(&mut SilentProgress).unwrap();
    let best = summary.best_fitness.unwrap();
    // Random 6-d points average above 100; well below that means the
    // search actually descended.
    assert!(best < 40.0, "expected descent on rastrigin, got {best}");
}

#[test]
fn subset_split_with_roulette_selection() {
    let mut config = base_config(17, 50, 80);
    config.selection.method = SelectionMethod::Roulette;
    let mut weight_rng = StdRng::seed_from_u64(818);
    let evaluator = SubsetSplitEvaluator::random(40, &mut weight_rng);

    let mut env = Environment::new(
        config,
        Arc::new(BitStringSpec::new(40)),
        Box::new(MultiPointCrossover::new(2)),
        Box::new(FlipMutation),
        Arc::new(evaluator),
    )
    .unwrap();
    let summary = env.run(&mut SilentProgress).unwrap();
    assert!(summary.best_fitness.unwrap() < 0.05);
}

#[test]
fn symbolic_regression_finds_a_low_error_expression() {
    let evaluator = RegressionEvaluator::from_target(
        ExprMapper::new(5),
        |x| x * x + x,
        -2.0,
        2.0,
        30,
    );
    let mut config = base_config(23, 60, 150);
    config.engine.hall_of_fame_size = 5;

    let mut env = Environment::new(
        config,
        Arc::new(ChainSpec::new(32, 0i64, 1023)),
        Box::new(MultiPointCrossover::new(2)),
        Box::new(ResetMutation),
        Arc::new(evaluator),
    )
    .unwrap();
    let summary = env.run(&mut SilentProgress).unwrap();
    let first_best = summary.reports.first().unwrap().population_best.unwrap();
    let final_best = summary.best_fitness.unwrap();
    assert!(final_best <= first_best);
    assert!(final_best < 2.0, "expected mse below 2, got {final_best}");

    // The archived genome decodes back to the same expression.
    let entry = env.hall_of_fame().best().unwrap();
    let mapper = ExprMapper::new(5);
    let decoded_once = mapper.decode(entry.genome.genes());
    let decoded_twice = mapper.decode(entry.genome.genes());
    assert_eq!(decoded_once, decoded_twice);
}

#[test]
fn fixed_seed_runs_are_identical_and_records_replay() {
    let make_env = |seed: u64| {
        let mut weight_rng = StdRng::seed_from_u64(99);
        let evaluator = SubsetSplitEvaluator::random(24, &mut weight_rng);
        Environment::new(
            base_config(seed, 20, 60),
            Arc::new(BitStringSpec::new(24)),
            Box::new(MultiPointCrossover::new(2)),
            Box::new(FlipMutation),
            Arc::new(evaluator),
        )
        .unwrap()
    };

    // First run with a mid-flight tuning update.
    let mut original = make_env(3);
    original.control().queue_update(TunableParam::MutationRate, 0.7);
    let original_summary = original.run(&mut SilentProgress).unwrap();
    assert_eq!(original_summary.trace.updates.len(), 1);

    // Save and reload the record, then replay the trace with the same seed.
    let dir = std::env::temp_dir().join("mendel-record-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("run.json");
    let record = RunRecord::from_summary(&original_summary, original.config());
    record.save(&path).unwrap();
    let loaded = RunRecord::load(&path).unwrap();
    assert_eq!(loaded.seed, original_summary.seed);

    let mut replayed = make_env(loaded.seed);
    replayed.schedule_replay(&loaded.trace);
    let replay_summary = replayed.run(&mut SilentProgress).unwrap();

    assert_eq!(original_summary.best_fitness, replay_summary.best_fitness);
    let bests_a: Vec<_> = original_summary
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
fn island_model_beats_or_matches_its_worst_island() {
    let mut rng = StdRng::seed_from_u64(4242);
    let shared = Arc::new(SalesmanEvaluator::random(20, &mut rng));

    struct Shared(Arc<SalesmanEvaluator>);
    impl Evaluator<Permutation> for Shared {
        fn evaluate(&self, genome: &Permutation) -> anyhow::Result<f64> {
            self.0.evaluate(genome)
        }
    }

    let island_config = mendel::config::IslandConfig {
        islands: 4,
        exchange_interval: 8,
        exchange_count: 2,
    };
    let mut model = IslandModel::from_builder(&island_config, |idx| {
        Environment::new(
            base_config(900 + idx as u64, 40, 50),
            Arc::new(PermutationSpec::new(20)),
            Box::new(PmxCrossover),
            Box::new(PermutationMutation),
            Arc::new(Shared(Arc::clone(&shared))),
        )
    })
    .unwrap();

    let summary = model.run(40).unwrap();
    let global = summary.best.unwrap().fitness;
    for island in model.islands() {
        let island_best = island.hall_of_fame().best().unwrap().fitness;
        assert!(global <= island_best);
    }
}

#[test]
fn evaluation_errors_do_not_abort_a_run() {
    /// Rejects tours whose first stop is city 0.
    struct Picky(Arc<SalesmanEvaluator>);
    impl Evaluator<Permutation> for Picky {
        fn evaluate(&self, genome: &Permutation) -> anyhow::Result<f64> {
            if genome.get(0) == 0 {
                anyhow::bail!("tour starts at the depot");
            }
            self.0.evaluate(genome)
        }
    }

    let mut rng = StdRng::seed_from_u64(7001);
    let evaluator = Arc::new(SalesmanEvaluator::random(12, &mut rng));
    let mut env = Environment::new(
        base_config(71, 15, 60),
        Arc::new(PermutationSpec::new(12)),
        Box::new(PmxCrossover),
        Box::new(PermutationMutation),
        Arc::new(Picky(evaluator)),
    )
    .unwrap();
    let summary = env.run(&mut SilentProgress).unwrap();
    assert!(summary.best_fitness.is_some());
    // Rejections happened somewhere along the run.
    let invalid_seen: usize = summary
        .reports
        .iter()
        .map(|r| r.population_size - r.valid)
        .sum();
    assert!(invalid_seen > 0);
    // The archive never contains a rejected tour.
    for entry in env.hall_of_fame().entries() {
        assert_ne!(entry.genome.get(0), 0);
    }
}

#[test]
fn chain_genome_round_trips_through_serde() {
    let chain = Chain::new(vec![0.25f64, -0.5, 0.125], -1.0, 1.0);
    let json = serde_json::to_string(&chain).unwrap();
    let back: Chain<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, chain);
}
