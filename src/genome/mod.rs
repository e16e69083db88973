pub mod binary;
pub mod chain;
pub mod permutation;

pub use binary::{BitString, BitStringSpec};
pub use chain::{Chain, ChainSpec, GeneValue};
pub use permutation::{Permutation, PermutationSpec};

use rand::rngs::StdRng;
use serde::Serialize;

/// Heritable data of a candidate solution.
///
/// Variation operators work on genomes; everything else (fitness, lineage,
/// identity) lives on `Individual`.
pub trait Genome: Clone + Send + Sync + Serialize + 'static {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable content string used for hall-of-fame deduplication.
    fn signature(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Short human-readable rendering for reports and the UI.
    fn describe(&self) -> String;
}

/// Draws random genomes for population seeding and immigration.
pub trait Sampler<G: Genome>: Send + Sync {
    fn sample(&self, rng: &mut StdRng) -> G;
}
