pub mod genes;
pub mod genome;
pub mod innovation;
pub mod network;
pub mod ops;
pub mod species;
pub mod xor;

pub use genes::{ConnectionGene, NodeGene, NodeKind};
pub use genome::NeatGenome;
pub use innovation::InnovationTracker;
pub use network::Network;
pub use ops::{NeatCrossover, NeatMutation, NeatSampler};
pub use species::{compatibility_distance, SpeciatedSelector};
pub use xor::XorEvaluator;
