//! Insertion sort as a step generator.

use crate::algorithm::{Algorithm, StepGenerator};
use crate::record::{Pull, RunCounters, Workspace};

/// Stepwise insertion sort over a private copy of the input.
///
/// The key travels left by exchanging places with each strictly greater
/// predecessor, so every snapshot holds the same multiset as the input.
/// Each predecessor check counts as a comparison, including the one that
/// stops the key. Each shift counts as a swap and yields a step highlighting
/// both slots; when the key settles a step highlights its final slot.
#[derive(Debug, Clone)]
pub struct InsertionSort<T> {
    ws: Workspace<T>,
    next: usize,
    /// Current position of the key being inserted, if any
    key_at: Option<usize>,
}

impl<T: Ord + Clone> InsertionSort<T> {
    /// Create a generator over a copy of `input`.
    pub fn new(input: &[T]) -> Self {
        Self {
            ws: Workspace::new(input),
            next: 1,
            key_at: None,
        }
    }
}

impl<T: Ord + Clone + Send> StepGenerator<T> for InsertionSort<T> {
    fn pull(&mut self) -> Pull<T> {
        loop {
            if let Some(pos) = self.key_at {
                if pos > 0 {
                    self.ws.counters.comparisons += 1;
                    if self.ws.elements[pos - 1] > self.ws.elements[pos] {
                        self.ws.elements.swap(pos - 1, pos);
                        self.ws.counters.swaps += 1;
                        self.key_at = Some(pos - 1);
                        return self.ws.step(&[pos - 1, pos]);
                    }
                }
                self.key_at = None;
                return self.ws.step(&[pos]);
            }

            if self.next >= self.ws.len() {
                return self.ws.finish();
            }
            self.key_at = Some(self.next);
            self.next += 1;
        }
    }

    fn counters(&self) -> RunCounters {
        self.ws.counters
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Insertion
    }

    fn is_exhausted(&self) -> bool {
        self.ws.is_finished()
    }
}
