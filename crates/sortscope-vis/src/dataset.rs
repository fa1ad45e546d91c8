//! Random sequences to sort.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::events::Value;

/// Largest sequence the visualizer will generate.
pub const MAX_SIZE: usize = 500;

/// Smallest and largest generated value; bars need a visible minimum height.
pub const VALUE_RANGE: std::ops::RangeInclusive<Value> = 5..=100;

/// Supplies sequences for the controller to sort.
pub trait DataSource: Send {
    /// Produce exactly `n` elements.
    fn generate(&mut self, n: usize) -> Vec<Value>;
}

/// Uniform values in [`VALUE_RANGE`], shuffled.
#[derive(Debug, Clone)]
pub struct RandomData {
    rng: StdRng,
}

impl RandomData {
    /// Seeded for reproducible sequences, or from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl DataSource for RandomData {
    fn generate(&mut self, n: usize) -> Vec<Value> {
        let mut values: Vec<Value> = (0..n).map(|_| self.rng.gen_range(VALUE_RANGE)).collect();
        values.shuffle(&mut self.rng);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let mut source = RandomData::new(Some(1));
        for n in [0, 1, 20, MAX_SIZE] {
            assert_eq!(source.generate(n).len(), n);
        }
    }

    #[test]
    fn values_stay_in_range() {
        let mut source = RandomData::new(Some(2));
        assert!(source.generate(1000).iter().all(|v| VALUE_RANGE.contains(v)));
    }

    #[test]
    fn seed_is_deterministic() {
        let a = RandomData::new(Some(42)).generate(50);
        let b = RandomData::new(Some(42)).generate(50);
        let c = RandomData::new(Some(43)).generate(50);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
