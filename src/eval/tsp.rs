use super::Evaluator;
use crate::genome::{Genome, Permutation};
use rand::rngs::StdRng;
use rand::Rng;

/// Traveling-salesman tour length over a fixed set of cities, closing edge
/// included; shorter is better.
pub struct SalesmanEvaluator {
    cities: Vec<(f64, f64)>,
    distances: Vec<Vec<f64>>,
}

impl SalesmanEvaluator {
    pub fn new(cities: Vec<(f64, f64)>) -> Self {
        let distances = Self::distance_matrix(&cities);
        Self { cities, distances }
    }

    /// Random cities in the unit square.
    pub fn random(count: usize, rng: &mut StdRng) -> Self {
        let cities = (0..count)
            .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
            .collect();
        Self::new(cities)
    }

    pub fn cities(&self) -> &[(f64, f64)] {
        &self.cities
    }

    fn distance_matrix(cities: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let n = cities.len();
        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            let (x1, y1) = cities[i];
            for j in (i + 1)..n {
                let (x2, y2) = cities[j];
                let d = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        distances
    }

    pub fn tour_length(&self, tour: &Permutation) -> f64 {
        let order = tour.order();
        let mut total = 0.0;
        for window in order.windows(2) {
            total += self.distances[window[0]][window[1]];
        }
        if let (Some(first), Some(last)) = (order.first(), order.last()) {
            total += self.distances[*last][*first];
        }
        total
    }
}

impl Evaluator<Permutation> for SalesmanEvaluator {
    fn evaluate(&self, genome: &Permutation) -> anyhow::Result<f64> {
        if genome.len() != self.cities.len() {
            anyhow::bail!(
                "tour visits {} stops but there are {} cities",
                genome.len(),
                self.cities.len()
            );
        }
        Ok(self.tour_length(genome))
    }

    fn name(&self) -> &'static str {
        "salesman"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn square_tour_has_known_length() {
        let evaluator = SalesmanEvaluator::new(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
        ]);
        let tour = Permutation::new(vec![0, 1, 2, 3]);
        assert!((evaluator.tour_length(&tour) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_tour_is_longer() {
        let evaluator = SalesmanEvaluator::new(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
        ]);
        let around = Permutation::new(vec![0, 1, 2, 3]);
        let crossing = Permutation::new(vec![0, 2, 1, 3]);
        assert!(evaluator.tour_length(&crossing) > evaluator.tour_length(&around));
    }

    #[test]
    fn wrong_tour_size_is_an_evaluation_error() {
        let mut rng = StdRng::seed_from_u64(13);
        let evaluator = SalesmanEvaluator::random(10, &mut rng);
        let tour = Permutation::identity(8);
        assert!(evaluator.evaluate(&tour).is_err());
    }
}
