pub mod runner;

pub use runner::{EvolutionRunner, RunOutput, RunParams};
