use super::ast::Expr;
use super::mapper::ExprMapper;
use crate::eval::Evaluator;
use crate::genome::Chain;

/// Scores a linear code genome by decoding it to an expression and taking
/// the mean squared error against sampled target points. Minimize.
pub struct RegressionEvaluator {
    mapper: ExprMapper,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl RegressionEvaluator {
    pub fn new(mapper: ExprMapper, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        assert_eq!(xs.len(), ys.len(), "sample vectors must pair up");
        Self { mapper, xs, ys }
    }

    /// Sample a target function uniformly on `[min, max]`.
    pub fn from_target<F>(mapper: ExprMapper, target: F, min: f64, max: f64, samples: usize) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let samples = samples.max(2);
        let xs: Vec<f64> = (0..samples)
            .map(|i| min + (max - min) * i as f64 / (samples - 1) as f64)
            .collect();
        let ys: Vec<f64> = xs.iter().map(|x| target(*x)).collect();
        Self { mapper, xs, ys }
    }

    pub fn decode(&self, genome: &Chain<i64>) -> Expr {
        self.mapper.decode(genome.genes())
    }

    pub fn mse(&self, expr: &Expr) -> f64 {
        let total: f64 = self
            .xs
            .iter()
            .zip(&self.ys)
            .map(|(x, y)| {
                let predicted = expr.eval(*x);
                (predicted - y).powi(2)
            })
            .sum();
        total / self.xs.len() as f64
    }
}

impl Evaluator<Chain<i64>> for RegressionEvaluator {
    fn evaluate(&self, genome: &Chain<i64>) -> anyhow::Result<f64> {
        let expr = self.decode(genome);
        let mse = self.mse(&expr);
        if !mse.is_finite() {
            anyhow::bail!("expression diverged on the sample range");
        }
        Ok(mse)
    }

    fn name(&self) -> &'static str {
        "regression"
    }
}
