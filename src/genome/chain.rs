use super::{Genome, Sampler};
use rand::rngs::StdRng;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Gene element of a `Chain`: a bounded numeric value.
pub trait GeneValue:
    Copy + PartialOrd + Display + Send + Sync + Serialize + DeserializeOwned + 'static
{
    fn sample_between(rng: &mut StdRng, min: Self, max: Self) -> Self;

    /// Midpoint of two genes, used by blend crossover.
    fn blend(a: Self, b: Self) -> Self;
}

impl GeneValue for f64 {
    fn sample_between(rng: &mut StdRng, min: Self, max: Self) -> Self {
        rng.gen_range(min..=max)
    }

    fn blend(a: Self, b: Self) -> Self {
        (a + b) / 2.0
    }
}

impl GeneValue for i64 {
    fn sample_between(rng: &mut StdRng, min: Self, max: Self) -> Self {
        rng.gen_range(min..=max)
    }

    fn blend(a: Self, b: Self) -> Self {
        // Round-to-nearest midpoint so blending two ints stays in bounds.
        ((a as f64 + b as f64) / 2.0).round() as i64
    }
}

/// Fixed-length vector of bounded numeric genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Chain<T: GeneValue> {
    genes: Vec<T>,
    min_value: T,
    max_value: T,
}

impl<T: GeneValue> Chain<T> {
    pub fn new(genes: Vec<T>, min_value: T, max_value: T) -> Self {
        let chain = Self {
            genes,
            min_value,
            max_value,
        };
        chain.debug_check();
        chain
    }

    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [T] {
        &mut self.genes
    }

    pub fn bounds(&self) -> (T, T) {
        (self.min_value, self.max_value)
    }

    pub fn get(&self, idx: usize) -> T {
        self.genes[idx]
    }

    /// Replace one gene; the value must already be inside the bounds.
    pub fn set(&mut self, idx: usize, value: T) {
        debug_assert!(value >= self.min_value && value <= self.max_value);
        self.genes[idx] = value;
    }

    fn debug_check(&self) {
        debug_assert!(
            self.genes
                .iter()
                .all(|g| *g >= self.min_value && *g <= self.max_value),
            "chain gene out of bounds"
        );
    }
}

impl<T: GeneValue> Genome for Chain<T> {
    fn len(&self) -> usize {
        self.genes.len()
    }

    fn describe(&self) -> String {
        let shown: Vec<String> = self.genes.iter().take(8).map(|g| format!("{g:.3}")).collect();
        if self.genes.len() > 8 {
            format!("[{}, ..] ({} genes)", shown.join(", "), self.genes.len())
        } else {
            format!("[{}]", shown.join(", "))
        }
    }
}

/// Sampler for random chains of a fixed size and bounds.
#[derive(Debug, Clone)]
pub struct ChainSpec<T: GeneValue> {
    pub size: usize,
    pub min_value: T,
    pub max_value: T,
}

impl<T: GeneValue> ChainSpec<T> {
    pub fn new(size: usize, min_value: T, max_value: T) -> Self {
        Self {
            size,
            min_value,
            max_value,
        }
    }
}

impl<T: GeneValue> Sampler<Chain<T>> for ChainSpec<T> {
    fn sample(&self, rng: &mut StdRng) -> Chain<T> {
        let genes = (0..self.size)
            .map(|_| T::sample_between(rng, self.min_value, self.max_value))
            .collect();
        Chain::new(genes, self.min_value, self.max_value)
    }
}
