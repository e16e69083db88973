use super::Individual;
use crate::config::{OptimizationDirection, PopulationConfig};
use crate::genome::{Genome, Sampler};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Order-aware container of individuals.
///
/// When `keep_sorted` is on, index 0 holds the best individual for the
/// configured direction; invalid individuals always rank last.
pub struct Population<G: Genome> {
    members: Vec<Individual<G>>,
    sampler: Arc<dyn Sampler<G>>,
    target_size: usize,
    immigration_rate: f64,
    direction: OptimizationDirection,
    keep_sorted: bool,
    sorted: bool,
}

impl<G: Genome> Population<G> {
    pub fn new(sampler: Arc<dyn Sampler<G>>, config: &PopulationConfig, rng: &mut StdRng) -> Self {
        let members = (0..config.size)
            .map(|_| Individual::new(sampler.sample(rng), "random", 0))
            .collect();
        Self {
            members,
            sampler,
            target_size: config.size,
            immigration_rate: config.immigration_rate,
            direction: config.direction,
            keep_sorted: config.keep_sorted,
            sorted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    pub fn set_immigration_rate(&mut self, rate: f64) {
        self.immigration_rate = rate.clamp(0.0, 1.0);
    }

    pub fn members(&self) -> &[Individual<G>] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Individual<G>] {
        self.sorted = false;
        &mut self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.members.iter()
    }

    pub fn get(&self, idx: usize) -> &Individual<G> {
        &self.members[idx]
    }

    /// Replace the population with the selection survivors; each survivor
    /// ages by one generation.
    pub fn replace_with(&mut self, mut selection: Vec<Individual<G>>) {
        for ind in &mut selection {
            ind.survive();
        }
        self.members = selection;
        self.sorted = false;
        self.resort();
    }

    /// Top the population back up to its target size with random
    /// individuals. Returns the number added.
    pub fn refill(&mut self, generation: u32, rng: &mut StdRng) -> usize {
        let missing = self.target_size.saturating_sub(self.members.len());
        for _ in 0..missing {
            let genome = self.sampler.sample(rng);
            self.members.push(Individual::new(genome, "random", generation));
        }
        if missing > 0 {
            self.sorted = false;
            debug!("population refilled with {missing} random individuals");
        }
        missing
    }

    /// Inject random immigrants proportional to the immigration rate.
    /// Returns the number added.
    pub fn immigrate(&mut self, generation: u32, rng: &mut StdRng) -> usize {
        let count = (self.members.len() as f64 * self.immigration_rate) as usize;
        for _ in 0..count {
            let genome = self.sampler.sample(rng);
            self.members
                .push(Individual::new(genome, "immigration", generation));
        }
        if count > 0 {
            self.sorted = false;
        }
        count
    }

    /// Insert one individual, keeping the sort order when possible.
    pub fn insert(&mut self, individual: Individual<G>) {
        if self.keep_sorted && self.sorted && individual.is_valid() {
            let fitness = individual.fitness_or_worst(self.direction);
            let idx = self.members.partition_point(|m| {
                self.direction
                    .rank(m.fitness_or_worst(self.direction), fitness)
                    .is_lt()
            });
            self.members.insert(idx, individual);
        } else {
            self.members.push(individual);
            self.sorted = false;
        }
    }

    pub fn mark_unsorted(&mut self) {
        self.sorted = false;
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn sort(&mut self) {
        let direction = self.direction;
        self.members.sort_by(|a, b| {
            direction.rank(a.fitness_or_worst(direction), b.fitness_or_worst(direction))
        });
        self.sorted = true;
    }

    /// Sort only when the population promises to stay sorted.
    pub fn resort(&mut self) {
        if self.keep_sorted && !self.sorted {
            self.sort();
        }
    }

    /// Best valid individual, if any.
    pub fn best(&self) -> Option<&Individual<G>> {
        if self.sorted {
            return self.members.first().filter(|ind| ind.is_valid());
        }
        self.members
            .iter()
            .filter(|ind| ind.is_valid())
            .min_by(|a, b| {
                self.direction.rank(
                    a.fitness_or_worst(self.direction),
                    b.fitness_or_worst(self.direction),
                )
            })
    }

    /// Worst valid individual, if any.
    pub fn worst(&self) -> Option<&Individual<G>> {
        self.members
            .iter()
            .filter(|ind| ind.is_valid())
            .max_by(|a, b| {
                self.direction.rank(
                    a.fitness_or_worst(self.direction),
                    b.fitness_or_worst(self.direction),
                )
            })
    }

    /// Indices of the `n` best individuals, best first.
    pub fn top_indices(&self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.members.len()).collect();
        indices.sort_by(|&a, &b| {
            self.direction.rank(
                self.members[a].fitness_or_worst(self.direction),
                self.members[b].fitness_or_worst(self.direction),
            )
        });
        indices.truncate(n);
        indices
    }

    /// Uniformly sampled member index.
    pub fn sample_index(&self, rng: &mut StdRng) -> usize {
        rng.gen_range(0..self.members.len())
    }

    /// Mean fitness over valid individuals.
    pub fn mean_fitness(&self) -> Option<f64> {
        let valid: Vec<f64> = self.members.iter().filter_map(|ind| ind.fitness()).collect();
        if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<f64>() / valid.len() as f64)
        }
    }

    pub fn count_valid(&self) -> usize {
        self.members.iter().filter(|ind| ind.is_valid()).count()
    }

    /// Replace the worst individuals with arriving migrants.
    pub fn receive_migrants(&mut self, migrants: Vec<Individual<G>>) {
        if migrants.is_empty() {
            return;
        }
        self.sort();
        let keep = self.members.len().saturating_sub(migrants.len());
        self.members.truncate(keep);
        for mut migrant in migrants {
            migrant.push_origin("immigration");
            self.members.push(migrant);
        }
        self.sorted = false;
        self.resort();
    }
}
