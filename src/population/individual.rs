use crate::config::OptimizationDirection;
use crate::genome::Genome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn fresh_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A genome plus the bookkeeping the engine needs around it: identity,
/// lineage, and evaluation state.
#[derive(Debug, Clone)]
pub struct Individual<G: Genome> {
    id: u64,
    genome: G,
    origin: Vec<String>,
    fitness: f64,
    evaluated: bool,
    valid: bool,
    eval_error: Option<String>,
    eval_time: Duration,
    birth_generation: u32,
    survived_generations: u32,
}

impl<G: Genome> Individual<G> {
    pub fn new(genome: G, origin: &str, birth_generation: u32) -> Self {
        Self {
            id: fresh_id(),
            genome,
            origin: vec![origin.to_string()],
            fitness: 0.0,
            evaluated: false,
            valid: false,
            eval_error: None,
            eval_time: Duration::ZERO,
            birth_generation,
            survived_generations: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn genome(&self) -> &G {
        &self.genome
    }

    pub fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    pub fn origin(&self) -> &[String] {
        &self.origin
    }

    pub fn push_origin(&mut self, origin: &str) {
        self.origin.push(origin.to_string());
    }

    /// Fitness of a successfully evaluated individual.
    pub fn fitness(&self) -> Option<f64> {
        if self.valid {
            Some(self.fitness)
        } else {
            None
        }
    }

    /// Fitness usable for ordering: invalid individuals rank last.
    pub fn fitness_or_worst(&self, direction: OptimizationDirection) -> f64 {
        if self.valid {
            self.fitness
        } else {
            direction.worst()
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn eval_error(&self) -> Option<&str> {
        self.eval_error.as_deref()
    }

    pub fn eval_time(&self) -> Duration {
        self.eval_time
    }

    pub fn birth_generation(&self) -> u32 {
        self.birth_generation
    }

    pub fn survived_generations(&self) -> u32 {
        self.survived_generations
    }

    /// Store an evaluation outcome. An `Err` marks the individual invalid;
    /// its fitness sentinel then depends on the optimization direction.
    pub fn register_evaluation(
        &mut self,
        outcome: std::result::Result<f64, String>,
        elapsed: Duration,
    ) {
        self.evaluated = true;
        self.eval_time = elapsed;
        match outcome {
            Ok(fitness) => {
                self.fitness = fitness;
                self.valid = fitness.is_finite();
                if !self.valid {
                    self.eval_error = Some("non-finite fitness".to_string());
                }
            }
            Err(message) => {
                self.valid = false;
                self.eval_error = Some(message);
            }
        }
    }

    /// Called after the genome changed: new identity, evaluation reset,
    /// lineage extended.
    pub fn mark_mutated(&mut self) {
        self.id = fresh_id();
        self.evaluated = false;
        self.valid = false;
        self.eval_error = None;
        self.origin.push(format!("mutation {}", self.id));
    }

    /// Ages the individual by one generation.
    pub fn survive(&mut self) {
        self.survived_generations += 1;
    }

    pub fn report(&self) -> String {
        let fitness = self
            .fitness()
            .map(|f| format!("{f:.4}"))
            .unwrap_or_else(|| "invalid".to_string());
        format!(
            "#{} {} - born gen {}, survived {} - {}",
            self.id,
            fitness,
            self.birth_generation,
            self.survived_generations,
            self.origin.join(" <- "),
        )
    }
}
