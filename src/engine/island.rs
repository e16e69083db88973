use super::environment::Environment;
use super::report::GenerationReport;
use crate::config::IslandConfig;
use crate::error::{MendelError, Result};
use crate::genome::Genome;
use crate::population::{HallEntry, Individual};
use log::info;
use rayon::prelude::*;

/// Clustered sub-populations: every island runs its own environment, and
/// every `exchange_interval` generations each island sends clones of its
/// best individuals to the next island on a ring.
pub struct IslandModel<G: Genome> {
    islands: Vec<Environment<G>>,
    exchange_interval: u32,
    exchange_count: usize,
}

#[derive(Debug, Clone)]
pub struct IslandSummary<G: Genome> {
    pub generations_run: u32,
    /// Best archived entry across all islands.
    pub best: Option<HallEntry<G>>,
    /// Final per-island reports, in island order.
    pub final_reports: Vec<GenerationReport>,
}

impl<G: Genome> IslandModel<G> {
    pub fn new(islands: Vec<Environment<G>>, config: &IslandConfig) -> Result<Self> {
        config.validate_against(islands.len())?;
        Ok(Self {
            islands,
            exchange_interval: config.exchange_interval,
            exchange_count: config.exchange_count,
        })
    }

    /// Build `config.islands` environments through a closure receiving the
    /// island index; the closure decides how to derive per-island seeds.
    pub fn from_builder<F>(config: &IslandConfig, build: F) -> Result<Self>
    where
        F: Fn(usize) -> Result<Environment<G>>,
    {
        let islands = (0..config.islands)
            .map(build)
            .collect::<Result<Vec<_>>>()?;
        Self::new(islands, config)
    }

    pub fn islands(&self) -> &[Environment<G>] {
        &self.islands
    }

    /// Step all islands for `generations`, exchanging migrants on the ring
    /// at the configured interval. Islands step in parallel.
    pub fn run(&mut self, generations: u32) -> Result<IslandSummary<G>> {
        // Score each island's initial population before the first step.
        self.islands.par_iter_mut().for_each(|island| island.prime());

        let mut last_reports: Vec<GenerationReport> = Vec::new();
        for generation in 1..=generations {
            let reports = self
                .islands
                .par_iter_mut()
                .map(|island| island.step())
                .collect::<Result<Vec<_>>>()?;
            last_reports = reports;

            if generation % self.exchange_interval == 0 {
                self.exchange();
            }
        }

        Ok(IslandSummary {
            generations_run: generations,
            best: self.best_entry().cloned(),
            final_reports: last_reports,
        })
    }

    /// Best archived entry over all islands.
    pub fn best_entry(&self) -> Option<&HallEntry<G>> {
        let mut best: Option<&HallEntry<G>> = None;
        for island in &self.islands {
            let direction = island.population().direction();
            if let Some(entry) = island.hall_of_fame().best() {
                best = match best {
                    None => Some(entry),
                    Some(current) if direction.is_better(entry.fitness, current.fitness) => {
                        Some(entry)
                    }
                    Some(current) => Some(current),
                };
            }
        }
        best
    }

    fn exchange(&mut self) {
        let count = self.islands.len();
        if count < 2 || self.exchange_count == 0 {
            return;
        }
        let batches: Vec<Vec<Individual<G>>> = self
            .islands
            .iter()
            .map(|island| island.top_clones(self.exchange_count))
            .collect();
        for (idx, batch) in batches.into_iter().enumerate() {
            let dest = (idx + 1) % count;
            info!(
                "island {idx} sends {} migrants to island {dest}",
                batch.len()
            );
            self.islands[dest].population_mut().receive_migrants(batch);
        }
    }
}

impl IslandConfig {
    fn validate_against(&self, island_count: usize) -> Result<()> {
        use crate::config::ConfigSection;
        self.validate()?;
        if island_count == 0 {
            return Err(MendelError::Engine(
                "island model needs at least one environment".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MendelConfig, OptimizationDirection};
    use crate::eval::{Evaluator, SalesmanEvaluator};
    use crate::genome::{Permutation, PermutationSpec};
    use crate::ops::{PermutationMutation, PmxCrossover};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn tsp_island(seed: u64, evaluator: Arc<SalesmanEvaluator>) -> Environment<Permutation> {
        let mut config = MendelConfig::default();
        config.engine.seed = Some(seed);
        config.engine.parallel_eval = false;
        config.population.size = 40;
        config.population.direction = OptimizationDirection::Minimize;
        Environment::new(
            config,
            Arc::new(PermutationSpec::new(15)),
            Box::new(PmxCrossover),
            Box::new(PermutationMutation),
            Arc::new(ArcEvaluator(evaluator)),
        )
        .unwrap()
    }

    /// Shares one salesman instance between islands.
    struct ArcEvaluator(Arc<SalesmanEvaluator>);

    impl Evaluator<Permutation> for ArcEvaluator {
        fn evaluate(&self, genome: &Permutation) -> anyhow::Result<f64> {
            self.0.evaluate(genome)
        }
    }

    #[test]
    fn islands_share_their_best_through_migration() {
        let mut rng = StdRng::seed_from_u64(77);
        let evaluator = Arc::new(SalesmanEvaluator::random(15, &mut rng));
        let config = IslandConfig {
            islands: 3,
            exchange_interval: 5,
            exchange_count: 2,
        };
        let mut model =
            IslandModel::from_builder(&config, |idx| Ok(tsp_island(100 + idx as u64, Arc::clone(&evaluator))))
                .unwrap();
        let summary = model.run(20).unwrap();
        assert_eq!(summary.generations_run, 20);
        assert_eq!(summary.final_reports.len(), 3);
        let best = summary.best.unwrap();
        // Every island evaluated the same instance, so the global best is at
        // least as good as each island's own archive.
        for island in model.islands() {
            let island_best = island.hall_of_fame().best().unwrap().fitness;
            assert!(best.fitness <= island_best);
        }
        // Migration leaves lineage marks behind.
        let immigrants = model
            .islands()
            .iter()
            .flat_map(|island| island.population().iter())
            .filter(|ind| {
                ind.origin()
                    .iter()
                    .any(|step| step == "immigration")
            })
            .count();
        assert!(immigrants > 0);
    }
}
