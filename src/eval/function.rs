use super::Evaluator;
use crate::genome::Chain;

/// Scores a float chain with an arbitrary objective function.
pub struct FunctionEvaluator {
    function: Box<dyn Fn(&[f64]) -> f64 + Send + Sync>,
}

impl FunctionEvaluator {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            function: Box::new(function),
        }
    }
}

impl Evaluator<Chain<f64>> for FunctionEvaluator {
    fn evaluate(&self, genome: &Chain<f64>) -> anyhow::Result<f64> {
        let value = (self.function)(genome.genes());
        if !value.is_finite() {
            anyhow::bail!("objective returned a non-finite value");
        }
        Ok(value)
    }

    fn name(&self) -> &'static str {
        "function"
    }
}

/// Sum of squares; global minimum 0 at the origin.
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// Highly multimodal benchmark; global minimum 0 at the origin.
pub fn rastrigin(x: &[f64]) -> f64 {
    let a = 10.0;
    a * x.len() as f64
        + x.iter()
            .map(|v| v * v - a * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmarks_are_zero_at_origin() {
        assert_eq!(sphere(&[0.0, 0.0, 0.0]), 0.0);
        assert!(rastrigin(&[0.0, 0.0]).abs() < 1e-9);
    }

    #[test]
    fn non_finite_objective_is_an_evaluation_error() {
        let evaluator = FunctionEvaluator::new(|_| f64::NAN);
        let genome = Chain::new(vec![0.0], -1.0, 1.0);
        assert!(evaluator.evaluate(&genome).is_err());
    }
}
