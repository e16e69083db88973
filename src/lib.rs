pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod genome;
pub mod neat;
pub mod ops;
pub mod population;
pub mod symreg;
pub mod ui;

pub use config::{ConfigManager, MendelConfig, OptimizationDirection};
pub use engine::{Environment, IslandModel, RunRecord};
pub use error::{MendelError, Result};
pub use genome::{BitString, Chain, Genome, Permutation, Sampler};
pub use population::{HallOfFame, Individual, Population};
