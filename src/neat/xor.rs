use super::genome::NeatGenome;
use super::network::Network;
use crate::eval::Evaluator;

const CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Classic XOR benchmark for graph genomes: fitness is `4 - sum of squared
/// errors`, so a perfect network scores 4. Maximize.
pub struct XorEvaluator;

impl Evaluator<NeatGenome> for XorEvaluator {
    fn evaluate(&self, genome: &NeatGenome) -> anyhow::Result<f64> {
        let network = Network::from_genome(genome);
        let mut error = 0.0;
        for (inputs, expected) in CASES {
            let outputs = network.activate(&inputs)?;
            let got = outputs.first().copied().unwrap_or(0.0);
            error += (got - expected).powi(2);
        }
        Ok(4.0 - error)
    }

    fn name(&self) -> &'static str {
        "xor"
    }
}
