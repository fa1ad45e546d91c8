//! Top-down merge sort as a step generator.
//!
//! The recursion is simulated with an explicit stack of frames. A `Sort`
//! frame splits its range and schedules `Sort(left)`, `Sort(right)` and then
//! `Merge` in that order; ranges of length <= 1 are already sorted.
//!
//! # Staged merge
//!
//! While a range is being merged it is laid out as
//!
//! ```text
//! lo          out        right            hi
//! | merged... | left rem. | right rem.    |
//! ```
//!
//! Taking the left front writes it in place. Taking the right front rotates
//! it down to `out`, shifting the left remainder up by one. Either way a
//! single output write happens at `out`, and the unmerged elements stay
//! inside the range, so every snapshot is a permutation of the input.

use crate::algorithm::{Algorithm, StepGenerator};
use crate::record::{Pull, RunCounters, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Sort { lo: usize, hi: usize },
    Merge { lo: usize, mid: usize, hi: usize },
}

/// Cursor over a merge in progress.
#[derive(Debug, Clone, Copy)]
struct Merging {
    /// Next output slot; also the front of the left remainder
    out: usize,
    /// Front of the right remainder
    right: usize,
    hi: usize,
}

/// Stepwise merge sort over a private copy of the input.
///
/// Ties go to the left half. Comparisons and writes are counted; swaps stay
/// at zero.
#[derive(Debug, Clone)]
pub struct MergeSort<T> {
    ws: Workspace<T>,
    stack: Vec<Frame>,
    merging: Option<Merging>,
}

impl<T: Ord + Clone> MergeSort<T> {
    /// Create a generator over a copy of `input`.
    pub fn new(input: &[T]) -> Self {
        let ws = Workspace::new(input);
        let stack = vec![Frame::Sort { lo: 0, hi: ws.len() }];
        Self {
            ws,
            stack,
            merging: None,
        }
    }

    /// Advance the active merge by one write, if one is in progress.
    fn merge_one(&mut self) -> Option<usize> {
        let m = self.merging.as_mut()?;
        if m.out >= m.hi {
            self.merging = None;
            return None;
        }

        let written = m.out;
        if m.out < m.right && m.right < m.hi {
            self.ws.counters.comparisons += 1;
            if self.ws.elements[m.right] < self.ws.elements[m.out] {
                self.ws.elements[m.out..=m.right].rotate_right(1);
                m.right += 1;
            }
        } else if m.out == m.right {
            // Left exhausted: the right remainder is already in place.
            m.right += 1;
        }
        m.out += 1;
        self.ws.counters.writes += 1;
        Some(written)
    }
}

impl<T: Ord + Clone + Send> StepGenerator<T> for MergeSort<T> {
    fn pull(&mut self) -> Pull<T> {
        loop {
            if let Some(written) = self.merge_one() {
                return self.ws.step(&[written]);
            }

            match self.stack.pop() {
                Some(Frame::Sort { lo, hi }) => {
                    if hi - lo <= 1 {
                        continue;
                    }
                    let mid = lo + (hi - lo) / 2;
                    self.stack.push(Frame::Merge { lo, mid, hi });
                    self.stack.push(Frame::Sort { lo: mid, hi });
                    self.stack.push(Frame::Sort { lo, hi: mid });
                }
                Some(Frame::Merge { lo, mid, hi }) => {
                    self.merging = Some(Merging {
                        out: lo,
                        right: mid,
                        hi,
                    });
                }
                None => return self.ws.finish(),
            }
        }
    }

    fn counters(&self) -> RunCounters {
        self.ws.counters
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Merge
    }

    fn is_exhausted(&self) -> bool {
        self.ws.is_finished()
    }
}
