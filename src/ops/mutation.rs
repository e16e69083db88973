use crate::config::RepeatMode;
use crate::genome::{BitString, Chain, GeneValue, Genome, Permutation};
use crate::population::Population;
use rand::rngs::StdRng;
use rand::Rng;

/// In-place change of one genome. Returns whether anything changed.
pub trait Mutation<G: Genome>: Send {
    fn apply(&mut self, genome: &mut G, rng: &mut StdRng) -> bool;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MutationStats {
    /// Individuals whose genome actually changed.
    pub individuals: usize,
    /// Total operator applications, including repeats.
    pub applications: usize,
}

/// Walk the population and run the repeat-probability loop on each member.
/// Individuals that changed are invalidated and get a fresh identity.
pub fn mutate_population<G: Genome>(
    op: &mut dyn Mutation<G>,
    population: &mut Population<G>,
    rate: f64,
    repeat: RepeatMode,
    rng: &mut StdRng,
) -> MutationStats {
    let mut stats = MutationStats::default();
    for ind in population.members_mut() {
        let mut probability = rate;
        let mut changed = false;
        while rng.gen::<f64>() < probability {
            stats.applications += 1;
            changed |= op.apply(ind.genome_mut(), rng);
            probability = repeat.decay(probability, rate);
            if probability <= f64::EPSILON {
                break;
            }
        }
        if changed {
            ind.mark_mutated();
            stats.individuals += 1;
        }
    }
    stats
}

/// Redraws one gene inside its bounds.
pub struct ResetMutation;

impl<T: GeneValue> Mutation<Chain<T>> for ResetMutation {
    fn apply(&mut self, genome: &mut Chain<T>, rng: &mut StdRng) -> bool {
        if genome.is_empty() {
            return false;
        }
        let idx = rng.gen_range(0..genome.len());
        let (min, max) = genome.bounds();
        let value = T::sample_between(rng, min, max);
        let previous = genome.get(idx);
        genome.set(idx, value);
        previous != value
    }

    fn name(&self) -> &'static str {
        "reset"
    }
}

/// Flips one random bit.
pub struct FlipMutation;

impl Mutation<BitString> for FlipMutation {
    fn apply(&mut self, genome: &mut BitString, rng: &mut StdRng) -> bool {
        if genome.is_empty() {
            return false;
        }
        let idx = rng.gen_range(0..genome.len());
        genome.flip(idx);
        true
    }

    fn name(&self) -> &'static str {
        "flip"
    }
}

/// Picks uniformly among the permutation rearrangement operations:
/// swap, move-element, move-segment (optionally reversed), reverse, shuffle.
pub struct PermutationMutation;

impl Mutation<Permutation> for PermutationMutation {
    fn apply(&mut self, genome: &mut Permutation, rng: &mut StdRng) -> bool {
        let n = genome.len();
        if n < 2 {
            return false;
        }
        match rng.gen_range(0..5) {
            0 => {
                let a = rng.gen_range(0..n);
                let b = rng.gen_range(0..n);
                genome.swap(a, b)
            }
            1 => {
                let idx = rng.gen_range(0..n);
                let new_pos = rng.gen_range(0..n);
                genome.move_element(idx, new_pos)
            }
            2 => {
                let idx = rng.gen_range(0..n);
                let len = rng.gen_range(1..n);
                let shift = rng.gen_range(1..n);
                let reverse = rng.gen::<bool>();
                genome.move_segment(idx, shift, len, reverse)
            }
            3 => {
                let a = rng.gen_range(0..n);
                let b = rng.gen_range(0..n);
                genome.reverse(a.min(b), a.max(b))
            }
            _ => {
                let a = rng.gen_range(0..n);
                let b = rng.gen_range(0..n);
                genome.shuffle(a.min(b), a.max(b), rng)
            }
        }
    }

    fn name(&self) -> &'static str {
        "permutation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptimizationDirection, PopulationConfig};
    use crate::genome::{BitStringSpec, PermutationSpec, Sampler};
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn flip_changes_exactly_one_bit() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut genome = BitString::new(vec![false; 16]);
        assert!(FlipMutation.apply(&mut genome, &mut rng));
        assert_eq!(genome.count_ones(), 1);
    }

    #[test]
    fn permutation_mutation_keeps_invariant() {
        let mut rng = StdRng::seed_from_u64(2);
        let spec = PermutationSpec::new(15);
        let mut op = PermutationMutation;
        for _ in 0..300 {
            let mut genome = spec.sample(&mut rng);
            op.apply(&mut genome, &mut rng);
            let mut sorted = genome.order().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..15).collect::<Vec<_>>());
        }
    }

    #[test]
    fn reset_keeps_chain_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut genome = Chain::new(vec![0.0f64; 10], -0.5, 0.5);
        let mut op = ResetMutation;
        for _ in 0..100 {
            op.apply(&mut genome, &mut rng);
        }
        assert!(genome.genes().iter().all(|g| (-0.5..=0.5).contains(g)));
    }

    #[test]
    fn mutated_individuals_are_invalidated() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = PopulationConfig {
            size: 30,
            immigration_rate: 0.0,
            direction: OptimizationDirection::Minimize,
            keep_sorted: false,
        };
        let mut pop = Population::new(Arc::new(BitStringSpec::new(12)), &config, &mut rng);
        for ind in pop.members_mut() {
            ind.register_evaluation(Ok(1.0), Duration::ZERO);
        }
        let mut op = FlipMutation;
        let stats = mutate_population(&mut op, &mut pop, 1.0, RepeatMode::Once, &mut rng);
        assert_eq!(stats.individuals, 30);
        assert!(stats.applications >= 30);
        assert!(pop.iter().all(|ind| !ind.is_evaluated()));
    }

    #[test]
    fn repeat_mode_once_applies_at_most_one_round() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = PopulationConfig {
            size: 10,
            immigration_rate: 0.0,
            direction: OptimizationDirection::Minimize,
            keep_sorted: false,
        };
        let mut pop = Population::new(Arc::new(BitStringSpec::new(12)), &config, &mut rng);
        let mut op = FlipMutation;
        let stats = mutate_population(&mut op, &mut pop, 1.0, RepeatMode::Once, &mut rng);
        assert_eq!(stats.applications, 10);
    }
}
