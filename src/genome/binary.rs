use super::{Genome, Sampler};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed-length string of bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn bits_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    pub fn get(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    pub fn flip(&mut self, idx: usize) {
        self.bits[idx] = !self.bits[idx];
    }

    pub fn flip_all(&mut self) {
        for bit in &mut self.bits {
            *bit = !*bit;
        }
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

impl Genome for BitString {
    fn len(&self) -> usize {
        self.bits.len()
    }

    fn signature(&self) -> String {
        self.bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
    }

    fn describe(&self) -> String {
        let shown: String = self
            .bits
            .iter()
            .take(32)
            .map(|b| if *b { '1' } else { '0' })
            .collect();
        if self.bits.len() > 32 {
            format!("{shown}.. ({} bits, {} ones)", self.bits.len(), self.count_ones())
        } else {
            shown
        }
    }
}

/// Sampler for uniform random bit strings of a fixed size.
#[derive(Debug, Clone)]
pub struct BitStringSpec {
    pub size: usize,
}

impl BitStringSpec {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Sampler<BitString> for BitStringSpec {
    fn sample(&self, rng: &mut StdRng) -> BitString {
        BitString::new((0..self.size).map(|_| rng.gen::<bool>()).collect())
    }
}
