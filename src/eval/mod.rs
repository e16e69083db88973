pub mod function;
pub mod subset;
pub mod tsp;

pub use function::{rastrigin, sphere, FunctionEvaluator};
pub use subset::SubsetSplitEvaluator;
pub use tsp::SalesmanEvaluator;

use crate::genome::Genome;
use crate::population::Population;
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Scores one genome. Failures are per-individual data, not engine errors:
/// the harness records the message and marks the individual invalid.
pub trait Evaluator<G: Genome>: Send + Sync {
    fn evaluate(&self, genome: &G) -> anyhow::Result<f64>;

    fn name(&self) -> &'static str {
        "evaluator"
    }
}

fn evaluate_one<G: Genome>(
    evaluator: &dyn Evaluator<G>,
    individual: &mut crate::population::Individual<G>,
) {
    let started = Instant::now();
    let outcome = evaluator
        .evaluate(individual.genome())
        .map_err(|e| e.to_string());
    if let Err(message) = &outcome {
        debug!("evaluation of #{} failed: {message}", individual.id());
    }
    individual.register_evaluation(outcome, started.elapsed());
}

/// Evaluate every not-yet-evaluated individual, sequentially or with rayon.
/// Returns the number of evaluations performed.
pub fn evaluate_population<G: Genome>(
    evaluator: &dyn Evaluator<G>,
    population: &mut Population<G>,
    parallel: bool,
) -> usize {
    let evaluated = if parallel {
        population
            .members_mut()
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .map(|ind| evaluate_one(evaluator, ind))
            .count()
    } else {
        let mut count = 0;
        for ind in population.members_mut() {
            if !ind.is_evaluated() {
                evaluate_one(evaluator, ind);
                count += 1;
            }
        }
        count
    };
    population.resort();
    evaluated
}
