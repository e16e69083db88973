use super::genome::NeatGenome;
use crate::config::{NeatConfig, OptimizationDirection, SelectionConfig};
use crate::error::{MendelError, Result};
use crate::ops::Selector;
use crate::population::{Individual, Population};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// NEAT compatibility distance:
/// delta = c1*E/N + c2*D/N + c3*mean weight difference of matching genes.
pub fn compatibility_distance(a: &NeatGenome, b: &NeatGenome, config: &NeatConfig) -> f64 {
    let conns_a = a.connections();
    let conns_b = b.connections();
    let max_a = conns_a.keys().next_back().copied().unwrap_or(0);
    let max_b = conns_b.keys().next_back().copied().unwrap_or(0);

    let mut matching = 0usize;
    let mut weight_diff = 0.0;
    let mut disjoint = 0usize;
    let mut excess = 0usize;

    for (innovation, conn_a) in conns_a {
        match conns_b.get(innovation) {
            Some(conn_b) => {
                matching += 1;
                weight_diff += (conn_a.weight - conn_b.weight).abs();
            }
            None => {
                if *innovation > max_b {
                    excess += 1;
                } else {
                    disjoint += 1;
                }
            }
        }
    }
    for innovation in conns_b.keys() {
        if !conns_a.contains_key(innovation) {
            if *innovation > max_a {
                excess += 1;
            } else {
                disjoint += 1;
            }
        }
    }

    let n = conns_a.len().max(conns_b.len()).max(1) as f64;
    let mean_weight_diff = if matching > 0 {
        weight_diff / matching as f64
    } else {
        0.0
    };
    config.excess_coeff * excess as f64 / n
        + config.disjoint_coeff * disjoint as f64 / n
        + config.weight_coeff * mean_weight_diff
}

struct Species {
    id: u32,
    representative: NeatGenome,
    best_ever: f64,
    last_improved: u32,
    age: u32,
    /// Member indices of the current selection pass.
    members: Vec<usize>,
}

/// Selector that clusters genomes into species by compatibility distance,
/// shares fitness within each species, and removes species that stopped
/// improving. Survivor slots are allotted proportionally to the species'
/// shifted mean fitness, so a fresh topology is not crowded out before it
/// had a chance to optimize.
pub struct SpeciatedSelector {
    neat: NeatConfig,
    ratio: f64,
    allow_invalid: bool,
    direction: OptimizationDirection,
    threshold: f64,
    species: Vec<Species>,
    next_species_id: u32,
    generation: u32,
}

impl SpeciatedSelector {
    pub fn new(
        neat: &NeatConfig,
        selection: &SelectionConfig,
        direction: OptimizationDirection,
    ) -> Self {
        Self {
            neat: neat.clone(),
            ratio: selection.selection_ratio,
            allow_invalid: selection.allow_invalid,
            direction,
            threshold: neat.compatibility_threshold,
            species: Vec::new(),
            next_species_id: 0,
            generation: 0,
        }
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn assign(&mut self, population: &Population<NeatGenome>) {
        for species in &mut self.species {
            species.members.clear();
            species.age += 1;
        }
        for (idx, ind) in population.iter().enumerate() {
            let genome = ind.genome();
            let mut placed = false;
            for species in &mut self.species {
                if compatibility_distance(genome, &species.representative, &self.neat)
                    < self.threshold
                {
                    species.members.push(idx);
                    placed = true;
                    break;
                }
            }
            if !placed {
                self.species.push(Species {
                    id: self.next_species_id,
                    representative: genome.clone(),
                    best_ever: self.direction.worst(),
                    last_improved: self.generation,
                    age: 0,
                    members: vec![idx],
                });
                self.next_species_id += 1;
            }
        }
        self.species.retain(|species| !species.members.is_empty());
    }

    fn species_best(&self, species: &Species, population: &Population<NeatGenome>) -> Option<f64> {
        species
            .members
            .iter()
            .filter_map(|&idx| population.get(idx).fitness())
            .reduce(|best, f| if self.direction.is_better(f, best) { f } else { best })
    }

    fn update_stagnation(&mut self, population: &Population<NeatGenome>) {
        // The species holding the global best is never removed.
        let mut protected: Option<u32> = None;
        let mut global_best = self.direction.worst();
        for species in &self.species {
            if let Some(best) = self.species_best(species, population) {
                if protected.is_none() || self.direction.is_better(best, global_best) {
                    global_best = best;
                    protected = Some(species.id);
                }
            }
        }

        let generation = self.generation;
        for species in &mut self.species {
            let best = species
                .members
                .iter()
                .filter_map(|&idx| population.get(idx).fitness())
                .reduce(|a, b| if self.direction.is_better(b, a) { b } else { a });
            if let Some(best) = best {
                if self.direction.is_better(best, species.best_ever) {
                    species.best_ever = best;
                    species.last_improved = generation;
                }
            }
        }

        let max_stagnation = self.neat.max_stagnation;
        let before = self.species.len();
        self.species.retain(|species| {
            generation.saturating_sub(species.last_improved) <= max_stagnation
                || Some(species.id) == protected
        });
        if self.species.len() < before {
            info!(
                "removed {} stagnant species at generation {generation}",
                before - self.species.len()
            );
        }
    }

    fn adjust_threshold(&mut self) {
        if self.species.len() > self.neat.target_species {
            self.threshold += self.neat.threshold_step;
        } else if self.species.len() < self.neat.target_species {
            self.threshold = (self.threshold - self.neat.threshold_step).max(0.5);
        }
    }
}

impl Selector<NeatGenome> for SpeciatedSelector {
    fn select(
        &mut self,
        population: &Population<NeatGenome>,
        rng: &mut StdRng,
    ) -> Result<Vec<Individual<NeatGenome>>> {
        self.generation += 1;
        self.assign(population);
        self.update_stagnation(population);
        self.adjust_threshold();
        debug!(
            "generation {}: {} species, threshold {:.2}",
            self.generation,
            self.species.len(),
            self.threshold
        );

        let target_total =
            ((self.ratio * population.target_size() as f64).ceil() as usize).max(1);

        // Shifted mean fitness per species, so every score is positive in
        // both optimization directions.
        let means: Vec<Option<f64>> = self
            .species
            .iter()
            .map(|species| {
                let valid: Vec<f64> = species
                    .members
                    .iter()
                    .filter_map(|&idx| population.get(idx).fitness())
                    .collect();
                if valid.is_empty() {
                    None
                } else {
                    Some(valid.iter().sum::<f64>() / valid.len() as f64)
                }
            })
            .collect();

        let finite: Vec<f64> = means.iter().filter_map(|m| *m).collect();
        if finite.is_empty() {
            return Err(MendelError::Selection(
                "speciated selection found no valid individual".to_string(),
            ));
        }
        let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let scores: Vec<f64> = means
            .iter()
            .map(|mean| match mean {
                None => 0.0,
                Some(mean) => match self.direction {
                    OptimizationDirection::Maximize => mean - min + 1e-6,
                    OptimizationDirection::Minimize => max - mean + 1e-6,
                },
            })
            .collect();
        let total_score: f64 = scores.iter().sum();

        let mut survivors = Vec::new();
        for (species, score) in self.species.iter_mut().zip(&scores) {
            if *score <= 0.0 {
                continue;
            }
            let slots = ((target_total as f64 * score / total_score).round() as usize).max(1);

            let mut members: Vec<usize> = species
                .members
                .iter()
                .copied()
                .filter(|&idx| self.allow_invalid || population.get(idx).is_valid())
                .collect();
            members.sort_by(|&a, &b| {
                self.direction.rank(
                    population.get(a).fitness_or_worst(self.direction),
                    population.get(b).fitness_or_worst(self.direction),
                )
            });
            for &idx in members.iter().take(slots) {
                survivors.push(population.get(idx).clone());
            }

            if let Some(&idx) = species.members.choose(rng) {
                species.representative = population.get(idx).genome().clone();
            }
        }

        if survivors.is_empty() {
            return Err(MendelError::Selection(
                "speciated selection produced an empty survivor set".to_string(),
            ));
        }
        Ok(survivors)
    }

    fn set_selection_ratio(&mut self, ratio: f64) {
        self.ratio = ratio.clamp(0.0, 1.0);
    }

    fn name(&self) -> &'static str {
        "speciated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Sampler;
    use crate::neat::ops::{NeatMutation, NeatSampler};
    use crate::ops::Mutation;
    use rand::SeedableRng;

    #[test]
    fn identical_genomes_have_zero_distance() {
        let sampler = NeatSampler::new(2, 1, NeatConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let genome = sampler.sample(&mut rng);
        let distance = compatibility_distance(&genome, &genome.clone(), &NeatConfig::default());
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn distance_grows_with_structural_divergence() {
        let config = NeatConfig::default();
        let sampler = NeatSampler::new(2, 1, config.clone());
        let mut rng = StdRng::seed_from_u64(2);
        let base = sampler.sample(&mut rng);
        let mut diverged = base.clone();
        let mut mutation = NeatMutation::new(config.clone(), sampler.tracker());
        for _ in 0..50 {
            mutation.apply(&mut diverged, &mut rng);
        }
        let near = compatibility_distance(&base, &base.clone(), &config);
        let far = compatibility_distance(&base, &diverged, &config);
        assert!(far > near);
    }

    #[test]
    fn weight_differences_contribute_to_distance() {
        let config = NeatConfig::default();
        let sampler = NeatSampler::new(2, 1, config.clone());
        let mut rng = StdRng::seed_from_u64(3);
        let base = sampler.sample(&mut rng);
        let mut shifted = base.clone();
        let innovations: Vec<u64> = shifted.connections().keys().copied().collect();
        for innovation in innovations {
            shifted.connection_mut(innovation).unwrap().weight += 2.0;
        }
        let distance = compatibility_distance(&base, &shifted, &config);
        assert!((distance - config.weight_coeff * 2.0).abs() < 1e-9);
    }
}
