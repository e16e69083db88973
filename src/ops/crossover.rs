use crate::genome::{BitString, Chain, GeneValue, Genome, Permutation};
use crate::population::{Individual, Population};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// Produces one offspring genome from two parents.
pub trait Crossover<G: Genome>: Send {
    fn offspring(&self, a: &Individual<G>, b: &Individual<G>, rng: &mut StdRng) -> G;

    fn name(&self) -> &'static str;
}

/// Walk the population; each member becomes a first parent with probability
/// `rate`, the partner is sampled uniformly, and the child is appended with
/// a crossover origin. Returns the number of offspring created.
pub fn cross_population<G: Genome>(
    op: &dyn Crossover<G>,
    population: &mut Population<G>,
    rate: f64,
    generation: u32,
    rng: &mut StdRng,
) -> usize {
    let len = population.len();
    let mut children = Vec::new();
    for idx in 0..len {
        if rng.gen::<f64>() < rate {
            let partner = population.sample_index(rng);
            let a = population.get(idx);
            let b = population.get(partner);
            let genome = op.offspring(a, b, rng);
            let origin = format!("crossover({}, {})", a.id(), b.id());
            children.push(Individual::new(genome, &origin, generation));
        }
    }
    let crossed = children.len();
    for child in children {
        population.insert(child);
    }
    crossed
}

fn sorted_cut_points(len: usize, points: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut cuts: Vec<usize> = (0..points).map(|_| rng.gen_range(0..len)).collect();
    cuts.sort_unstable();
    cuts
}

/// Copy the donor's genes into the target on alternating segments between
/// cut points.
fn splice_segments<T: Copy>(target: &mut [T], donor: &[T], cuts: &[usize]) {
    let len = target.len().min(donor.len());
    for pair in cuts.chunks(2) {
        let start = pair[0].min(len);
        let end = if pair.len() == 2 { pair[1].min(len) } else { len };
        if start < end {
            target[start..end].copy_from_slice(&donor[start..end]);
        }
    }
}

/// k-point crossover for linear genomes.
pub struct MultiPointCrossover {
    points: usize,
}

impl MultiPointCrossover {
    pub fn new(points: usize) -> Self {
        Self {
            points: points.max(1),
        }
    }
}

impl<T: GeneValue> Crossover<Chain<T>> for MultiPointCrossover {
    fn offspring(
        &self,
        a: &Individual<Chain<T>>,
        b: &Individual<Chain<T>>,
        rng: &mut StdRng,
    ) -> Chain<T> {
        let mut child = a.genome().clone();
        if child.len() <= 1 {
            return child;
        }
        let cuts = sorted_cut_points(child.len(), self.points, rng);
        splice_segments(child.genes_mut(), b.genome().genes(), &cuts);
        child
    }

    fn name(&self) -> &'static str {
        "multi-point"
    }
}

impl Crossover<BitString> for MultiPointCrossover {
    fn offspring(
        &self,
        a: &Individual<BitString>,
        b: &Individual<BitString>,
        rng: &mut StdRng,
    ) -> BitString {
        let mut child = a.genome().clone();
        if child.len() <= 1 {
            return child;
        }
        let cuts = sorted_cut_points(child.len(), self.points, rng);
        splice_segments(child.bits_mut(), b.genome().bits(), &cuts);
        child
    }

    fn name(&self) -> &'static str {
        "multi-point"
    }
}

/// Element-wise midpoint of the two parent chains.
pub struct BlendCrossover;

impl<T: GeneValue> Crossover<Chain<T>> for BlendCrossover {
    fn offspring(
        &self,
        a: &Individual<Chain<T>>,
        b: &Individual<Chain<T>>,
        _rng: &mut StdRng,
    ) -> Chain<T> {
        let mut child = a.genome().clone();
        for (idx, gene) in b.genome().genes().iter().enumerate() {
            let blended = T::blend(child.get(idx), *gene);
            child.set(idx, blended);
        }
        child
    }

    fn name(&self) -> &'static str {
        "blend"
    }
}

/// Partially mapped crossover: the segment between two cut points is aligned
/// with the second parent through repeated transpositions, which keeps the
/// child a permutation.
pub struct PmxCrossover;

impl Crossover<Permutation> for PmxCrossover {
    fn offspring(
        &self,
        a: &Individual<Permutation>,
        b: &Individual<Permutation>,
        rng: &mut StdRng,
    ) -> Permutation {
        let n = a.genome().len();
        if n < 2 {
            return a.genome().clone();
        }
        let c1 = rng.gen_range(0..n);
        let c2 = rng.gen_range(0..n);
        let (start, end) = (c1.min(c2), c1.max(c2));

        let mut child = a.genome().order().to_vec();
        let mut pos = a.genome().positions();
        for i in start..=end {
            let wanted = b.genome().get(i);
            if child[i] != wanted {
                let j = pos[wanted];
                let current = child[i];
                child.swap(i, j);
                pos[wanted] = i;
                pos[current] = j;
            }
        }
        Permutation::new(child)
    }

    fn name(&self) -> &'static str {
        "pmx"
    }
}

/// Builds the child tour outward from a random start element, extending
/// forward through the first parent or backward through the second with
/// equal probability, skipping elements already placed.
pub struct PathMergeCrossover;

impl Crossover<Permutation> for PathMergeCrossover {
    fn offspring(
        &self,
        a: &Individual<Permutation>,
        b: &Individual<Permutation>,
        rng: &mut StdRng,
    ) -> Permutation {
        let n = a.genome().len();
        if n < 2 {
            return a.genome().clone();
        }
        let start = rng.gen_range(0..n);
        let mut path: VecDeque<usize> = VecDeque::with_capacity(n);
        let mut seen = vec![false; n];
        path.push_back(start);
        seen[start] = true;

        let mut idx_a = a.genome().positions()[start];
        let mut idx_b = b.genome().positions()[start];

        while path.len() < n {
            if rng.gen::<f64>() < 0.5 {
                loop {
                    idx_a = (idx_a + 1) % n;
                    let value = a.genome().get(idx_a);
                    if !seen[value] {
                        seen[value] = true;
                        path.push_back(value);
                        break;
                    }
                }
            } else {
                loop {
                    idx_b = (idx_b + n - 1) % n;
                    let value = b.genome().get(idx_b);
                    if !seen[value] {
                        seen[value] = true;
                        path.push_front(value);
                        break;
                    }
                }
            }
        }
        Permutation::new(path.into_iter().collect())
    }

    fn name(&self) -> &'static str {
        "path-merge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{ChainSpec, PermutationSpec, Sampler};
    use rand::SeedableRng;

    fn is_permutation(perm: &Permutation) -> bool {
        let mut sorted = perm.order().to_vec();
        sorted.sort_unstable();
        sorted == (0..perm.len()).collect::<Vec<_>>()
    }

    #[test]
    fn multi_point_child_mixes_both_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Individual::new(
            Chain::new(vec![0.0; 10], 0.0, 1.0),
            "random",
            0,
        );
        let b = Individual::new(
            Chain::new(vec![1.0; 10], 0.0, 1.0),
            "random",
            0,
        );
        let op = MultiPointCrossover::new(2);
        let mut saw_mixture = false;
        for _ in 0..50 {
            let child = op.offspring(&a, &b, &mut rng);
            let ones = child.genes().iter().filter(|g| **g == 1.0).count();
            if ones > 0 && ones < 10 {
                saw_mixture = true;
                break;
            }
        }
        assert!(saw_mixture);
    }

    #[test]
    fn blend_is_elementwise_mean() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Individual::new(Chain::new(vec![0.0, 2.0], 0.0, 4.0), "random", 0);
        let b = Individual::new(Chain::new(vec![4.0, 2.0], 0.0, 4.0), "random", 0);
        let child = BlendCrossover.offspring(&a, &b, &mut rng);
        assert_eq!(child.genes(), &[2.0, 2.0]);
    }

    #[test]
    fn pmx_preserves_permutation_invariant() {
        let mut rng = StdRng::seed_from_u64(17);
        let spec = PermutationSpec::new(25);
        for _ in 0..100 {
            let a = Individual::new(spec.sample(&mut rng), "random", 0);
            let b = Individual::new(spec.sample(&mut rng), "random", 0);
            let child = PmxCrossover.offspring(&a, &b, &mut rng);
            assert!(is_permutation(&child));
        }
    }

    #[test]
    fn path_merge_preserves_permutation_invariant() {
        let mut rng = StdRng::seed_from_u64(23);
        let spec = PermutationSpec::new(25);
        for _ in 0..100 {
            let a = Individual::new(spec.sample(&mut rng), "random", 0);
            let b = Individual::new(spec.sample(&mut rng), "random", 0);
            let child = PathMergeCrossover.offspring(&a, &b, &mut rng);
            assert!(is_permutation(&child));
        }
    }

    #[test]
    fn cross_population_appends_children_with_lineage() {
        use crate::config::{OptimizationDirection, PopulationConfig};
        use std::sync::Arc;
        use std::time::Duration;

        let mut rng = StdRng::seed_from_u64(31);
        let config = PopulationConfig {
            size: 10,
            immigration_rate: 0.0,
            direction: OptimizationDirection::Minimize,
            keep_sorted: false,
        };
        let spec = ChainSpec::new(8, -1.0f64, 1.0);
        let mut pop = Population::new(Arc::new(spec), &config, &mut rng);
        for ind in pop.members_mut() {
            ind.register_evaluation(Ok(0.0), Duration::ZERO);
        }
        let op = MultiPointCrossover::new(2);
        let crossed = cross_population(&op, &mut pop, 1.0, 3, &mut rng);
        assert_eq!(crossed, 10);
        assert_eq!(pop.len(), 20);
        let children = pop
            .iter()
            .filter(|ind| ind.origin()[0].starts_with("crossover("))
            .count();
        assert_eq!(children, 10);
    }
}
