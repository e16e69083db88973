use super::{Genome, Sampler};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A permutation of `0..n`, used for ordering problems.
///
/// All rearrangement operations preserve the permutation invariant: every
/// element of `0..n` appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permutation {
    order: Vec<usize>,
}

impl Permutation {
    pub fn new(order: Vec<usize>) -> Self {
        let perm = Self { order };
        perm.debug_check();
        perm
    }

    pub fn identity(size: usize) -> Self {
        Self {
            order: (0..size).collect(),
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn get(&self, idx: usize) -> usize {
        self.order[idx]
    }

    /// Position of each element: `positions()[v]` is the index holding `v`.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0; self.order.len()];
        for (idx, &value) in self.order.iter().enumerate() {
            pos[value] = idx;
        }
        pos
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        self.order.swap(a, b);
        true
    }

    /// Move the element at `idx` to `new_pos`, shifting the range between.
    pub fn move_element(&mut self, idx: usize, new_pos: usize) -> bool {
        if idx == new_pos || idx >= self.order.len() {
            return false;
        }
        let value = self.order.remove(idx);
        let target = new_pos.min(self.order.len());
        self.order.insert(target, value);
        true
    }

    /// Move a block of `len` elements starting at `idx` so it lands `shift`
    /// positions later, optionally reversing the block.
    pub fn move_segment(&mut self, idx: usize, shift: usize, len: usize, reverse: bool) -> bool {
        let size = self.order.len();
        if len == 0 || len >= size || idx >= size {
            return false;
        }
        let len = len.min(size - idx);
        let mut segment: Vec<usize> = self.order.drain(idx..idx + len).collect();
        if reverse {
            segment.reverse();
        }
        let slots = self.order.len() + 1;
        let target = (idx + shift) % slots;
        if target == idx && !reverse {
            // Put it back untouched; nothing moved.
            self.order.splice(idx..idx, segment);
            return false;
        }
        self.order.splice(target..target, segment);
        self.debug_check();
        true
    }

    /// Reverse the inclusive range `a..=b`.
    pub fn reverse(&mut self, a: usize, b: usize) -> bool {
        if a >= b || b >= self.order.len() {
            return false;
        }
        self.order[a..=b].reverse();
        true
    }

    /// Shuffle the inclusive range `a..=b`.
    pub fn shuffle(&mut self, a: usize, b: usize, rng: &mut StdRng) -> bool {
        if a >= b || b >= self.order.len() {
            return false;
        }
        self.order[a..=b].shuffle(rng);
        true
    }

    fn debug_check(&self) {
        #[cfg(debug_assertions)]
        {
            let mut seen = vec![false; self.order.len()];
            for &value in &self.order {
                assert!(value < self.order.len(), "permutation value out of range");
                assert!(!seen[value], "duplicate value in permutation");
                seen[value] = true;
            }
        }
    }
}

impl Genome for Permutation {
    fn len(&self) -> usize {
        self.order.len()
    }

    fn signature(&self) -> String {
        self.order
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }

    fn describe(&self) -> String {
        let shown: Vec<String> = self.order.iter().take(12).map(|v| v.to_string()).collect();
        if self.order.len() > 12 {
            format!("{} .. ({} stops)", shown.join(" "), self.order.len())
        } else {
            shown.join(" ")
        }
    }
}

/// Sampler for uniform random permutations of a fixed size.
#[derive(Debug, Clone)]
pub struct PermutationSpec {
    pub size: usize,
}

impl PermutationSpec {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Sampler<Permutation> for PermutationSpec {
    fn sample(&self, rng: &mut StdRng) -> Permutation {
        let mut order: Vec<usize> = (0..self.size).collect();
        order.shuffle(rng);
        Permutation::new(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn is_valid(perm: &Permutation) -> bool {
        let mut sorted = perm.order().to_vec();
        sorted.sort_unstable();
        sorted == (0..perm.len()).collect::<Vec<_>>()
    }

    #[test]
    fn move_element_shifts_neighbors() {
        let mut perm = Permutation::new(vec![0, 1, 2, 3, 4]);
        assert!(perm.move_element(1, 3));
        assert_eq!(perm.order(), &[0, 2, 3, 1, 4]);
        assert!(is_valid(&perm));
    }

    #[test]
    fn move_segment_keeps_permutation_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        let spec = PermutationSpec::new(20);
        for _ in 0..200 {
            let mut perm = spec.sample(&mut rng);
            use rand::Rng;
            let idx = rng.gen_range(0..20);
            let len = rng.gen_range(1..8);
            let shift = rng.gen_range(0..20);
            perm.move_segment(idx, shift, len, rng.gen::<bool>());
            assert!(is_valid(&perm));
        }
    }

    #[test]
    fn reverse_range() {
        let mut perm = Permutation::new(vec![0, 1, 2, 3, 4]);
        assert!(perm.reverse(1, 3));
        assert_eq!(perm.order(), &[0, 3, 2, 1, 4]);
    }

    #[test]
    fn degenerate_operations_report_no_change() {
        let mut perm = Permutation::new(vec![0, 1, 2]);
        assert!(!perm.swap(1, 1));
        assert!(!perm.reverse(2, 2));
        assert!(!perm.move_element(0, 0));
    }
}
