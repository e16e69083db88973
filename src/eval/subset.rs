use super::Evaluator;
use crate::genome::{BitString, Genome};
use rand::rngs::StdRng;
use rand::Rng;

/// Splits a weight vector into two subsets along a bit string and scores the
/// imbalance between them; a perfect split scores 0.
pub struct SubsetSplitEvaluator {
    weights: Vec<f64>,
}

impl SubsetSplitEvaluator {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Random weights normalized to sum 1.
    pub fn random(size: usize, rng: &mut StdRng) -> Self {
        let mut weights: Vec<f64> = (0..size).map(|_| rng.gen::<f64>()).collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn subset_sums(&self, genome: &BitString) -> (f64, f64) {
        let mut ones = 0.0;
        let mut zeros = 0.0;
        for (weight, bit) in self.weights.iter().zip(genome.bits()) {
            if *bit {
                ones += weight;
            } else {
                zeros += weight;
            }
        }
        (ones, zeros)
    }
}

impl Evaluator<BitString> for SubsetSplitEvaluator {
    fn evaluate(&self, genome: &BitString) -> anyhow::Result<f64> {
        if genome.len() != self.weights.len() {
            anyhow::bail!(
                "bit string has {} bits but there are {} weights",
                genome.len(),
                self.weights.len()
            );
        }
        let (ones, zeros) = self.subset_sums(genome);
        Ok((ones - zeros).abs())
    }

    fn name(&self) -> &'static str {
        "subset-split"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn balanced_split_scores_zero() {
        let evaluator = SubsetSplitEvaluator::new(vec![0.25, 0.25, 0.25, 0.25]);
        let genome = BitString::new(vec![true, false, true, false]);
        assert!(evaluator.evaluate(&genome).unwrap().abs() < 1e-12);
    }

    #[test]
    fn random_weights_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(8);
        let evaluator = SubsetSplitEvaluator::random(64, &mut rng);
        let total: f64 = evaluator.weights().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn size_mismatch_is_an_evaluation_error() {
        let evaluator = SubsetSplitEvaluator::new(vec![0.5, 0.5]);
        let genome = BitString::new(vec![true]);
        assert!(evaluator.evaluate(&genome).is_err());
    }
}
