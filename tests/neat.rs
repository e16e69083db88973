use mendel::config::{MendelConfig, NeatConfig, OptimizationDirection};
use mendel::engine::progress::SilentProgress;
use mendel::engine::Environment;
use mendel::genome::{Genome, Sampler};
use mendel::neat::{
    compatibility_distance, NeatCrossover, NeatMutation, NeatSampler, Network, SpeciatedSelector,
    XorEvaluator,
};
use mendel::ops::{Mutation, Selector};
use mendel::population::Population;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn xor_config(seed: u64, generations: u32) -> MendelConfig {
    let mut config = MendelConfig::default();
    config.engine.seed = Some(seed);
    config.engine.max_generations = generations;
    config.engine.parallel_eval = false;
    config.population.size = 120;
    config.population.direction = OptimizationDirection::Maximize;
    // The NEAT operator runs its sub-mutations with their own
    // probabilities, so every individual passes through it once.
    config.variation.mutation_rate = 1.0;
    config.variation.repeat_mode = mendel::config::RepeatMode::Once;
    config.variation.crossover_rate = 0.25;
    config
}

#[test]
fn xor_evolution_improves_over_initial_networks() {
    let config = xor_config(404, 40);
    let sampler = NeatSampler::new(2, 1, config.neat.clone());
    let tracker = sampler.tracker();
    let mutation = NeatMutation::new(config.neat.clone(), tracker);
    let crossover = NeatCrossover::new(config.neat.clone(), OptimizationDirection::Maximize);

    let selector = SpeciatedSelector::new(
        &config.neat,
        &config.selection,
        OptimizationDirection::Maximize,
    );
    let mut env = Environment::new(
        config,
        Arc::new(sampler),
        Box::new(crossover),
        Box::new(mutation),
        Arc::new(XorEvaluator),
    )
    .unwrap();
    env.set_selector(Box::new(selector));

    let summary = env.run(&mut SilentProgress).unwrap();
    let first = summary.reports.first().unwrap().population_best.unwrap();
    let best = summary.best_fitness.unwrap();
    assert!(best >= first, "archive best {best} regressed below {first}");
    assert!(
        best > 2.5,
        "expected meaningful xor progress, got {best}"
    );

    // The winning genome still builds a working feed-forward network.
    let entry = env.hall_of_fame().best().unwrap();
    let network = Network::from_genome(&entry.genome);
    let out = network.activate(&[1.0, 0.0]).unwrap();
    assert_eq!(out.len(), 1);
}

#[test]
fn speciated_selection_keeps_multiple_species_alive() {
    let mut neat = NeatConfig::default();
    // A tight threshold so the structural split below is unambiguous.
    neat.compatibility_threshold = 1.0;
    let mut config = MendelConfig::default();
    config.population.size = 60;
    config.population.direction = OptimizationDirection::Maximize;
    config.selection.selection_ratio = 0.4;

    let sampler: Arc<dyn Sampler<mendel::neat::NeatGenome>> =
        Arc::new(NeatSampler::new(2, 1, neat.clone()));
    let mut rng = StdRng::seed_from_u64(55);
    let mut population = Population::new(sampler, &config.population, &mut rng);

    // Diverge half the population structurally so speciation has
    // something to split on.
    let sampler2 = NeatSampler::new(2, 1, neat.clone());
    let mut mutation = NeatMutation::new(neat.clone(), sampler2.tracker());
    for (idx, ind) in population.members_mut().iter_mut().enumerate() {
        if idx % 2 == 0 {
            for _ in 0..40 {
                mutation.apply(ind.genome_mut(), &mut rng);
            }
        }
        ind.register_evaluation(Ok(1.0 + (idx % 7) as f64), Duration::ZERO);
    }
    population.resort();

    let mut selector = SpeciatedSelector::new(&neat, &config.selection, OptimizationDirection::Maximize);
    let survivors = selector.select(&population, &mut rng).unwrap();
    assert!(!survivors.is_empty());
    assert!(
        selector.species_count() >= 2,
        "expected the population to split into species, got {}",
        selector.species_count()
    );
}

#[test]
fn compatibility_distance_is_symmetric() {
    let neat = NeatConfig::default();
    let sampler = NeatSampler::new(3, 2, neat.clone());
    let mut rng = StdRng::seed_from_u64(66);
    let a = sampler.sample(&mut rng);
    let mut b = sampler.sample(&mut rng);
    let mut mutation = NeatMutation::new(neat.clone(), sampler.tracker());
    for _ in 0..10 {
        mutation.apply(&mut b, &mut rng);
    }
    let ab = compatibility_distance(&a, &b, &neat);
    let ba = compatibility_distance(&b, &a, &neat);
    assert!((ab - ba).abs() < 1e-12);
    assert!(ab >= 0.0);
}

#[test]
fn neat_signatures_distinguish_structures() {
    let neat = NeatConfig::default();
    let sampler = NeatSampler::new(2, 1, neat.clone());
    let mut rng = StdRng::seed_from_u64(77);
    let base = sampler.sample(&mut rng);
    let mut grown = base.clone();
    let mut mutation = NeatMutation::new(neat, sampler.tracker());
    for _ in 0..30 {
        mutation.apply(&mut grown, &mut rng);
    }
    assert_ne!(base.signature(), grown.signature());
}
