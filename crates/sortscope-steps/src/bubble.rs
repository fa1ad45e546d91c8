//! Bubble sort as a step generator.
//!
//! Every adjacent comparison yields a step highlighting the pair. An
//! out-of-order pair is exchanged on the following pull, which yields a
//! second step for the same pair. Pass `i` only scans `0..n - i - 1`, since
//! the last `i` elements are already in their final place.

use crate::algorithm::{Algorithm, StepGenerator};
use crate::record::{Pull, RunCounters, Workspace};

/// Stepwise bubble sort over a private copy of the input.
#[derive(Debug, Clone)]
pub struct BubbleSort<T> {
    ws: Workspace<T>,
    pass: usize,
    j: usize,
    pending_swap: Option<usize>,
}

impl<T: Ord + Clone> BubbleSort<T> {
    /// Create a generator over a copy of `input`.
    pub fn new(input: &[T]) -> Self {
        Self {
            ws: Workspace::new(input),
            pass: 0,
            j: 0,
            pending_swap: None,
        }
    }
}

impl<T: Ord + Clone + Send> StepGenerator<T> for BubbleSort<T> {
    fn pull(&mut self) -> Pull<T> {
        if let Some(j) = self.pending_swap.take() {
            self.ws.elements.swap(j, j + 1);
            self.ws.counters.swaps += 1;
            self.j = j + 1;
            return self.ws.step(&[j, j + 1]);
        }

        let n = self.ws.len();
        while self.pass < n {
            if self.j + 1 + self.pass < n {
                let j = self.j;
                self.ws.counters.comparisons += 1;
                if self.ws.elements[j] > self.ws.elements[j + 1] {
                    self.pending_swap = Some(j);
                } else {
                    self.j += 1;
                }
                return self.ws.step(&[j, j + 1]);
            }
            self.pass += 1;
            self.j = 0;
        }

        self.ws.finish()
    }

    fn counters(&self) -> RunCounters {
        self.ws.counters
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Bubble
    }

    fn is_exhausted(&self) -> bool {
        self.ws.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_to_end;

    #[test]
    fn three_element_walkthrough() {
        let (steps, fin) = run_to_end(BubbleSort::new(&[3, 1, 2])).unwrap();

        let trace: Vec<_> = steps
            .iter()
            .map(|s| (s.highlighted.clone(), s.counters.comparisons, s.counters.swaps))
            .collect();
        assert_eq!(
            trace,
            vec![
                (vec![0, 1], 1, 0), // compare 3,1
                (vec![0, 1], 1, 1), // swap -> 1,3,2
                (vec![1, 2], 2, 1), // compare 3,2
                (vec![1, 2], 2, 2), // swap -> 1,2,3
                (vec![0, 1], 3, 2), // pass 2: compare 1,2
            ]
        );
        assert_eq!(steps[1].elements, vec![1, 3, 2]);
        assert_eq!(steps[3].elements, vec![1, 2, 3]);
        assert_eq!(fin.elements, vec![1, 2, 3]);
        assert!(fin.highlighted.is_empty());
    }

    #[test]
    fn sorted_input_never_swaps() {
        let (steps, fin) = run_to_end(BubbleSort::new(&[1, 2, 3, 4])).unwrap();
        // 3 + 2 + 1 comparisons, one step each
        assert_eq!(steps.len(), 6);
        assert!(steps.iter().all(|s| s.counters.swaps == 0));
        assert_eq!(fin.elements, vec![1, 2, 3, 4]);
    }

    #[test]
    fn equal_elements_are_not_exchanged() {
        let (steps, _) = run_to_end(BubbleSort::new(&[7, 7])).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].counters.swaps, 0);
    }

    #[test]
    fn never_writes() {
        let (steps, _) = run_to_end(BubbleSort::new(&[5, 4, 3, 2, 1])).unwrap();
        assert!(steps.iter().all(|s| s.counters.writes == 0));
        assert_eq!(steps.last().unwrap().counters.swaps, 10);
    }

    #[test]
    fn exhausts_after_final() {
        let mut generator = BubbleSort::new(&[2, 1]);
        while !generator.pull().is_terminal() {}
        assert!(generator.is_exhausted());
        assert_eq!(generator.pull(), Pull::Exhausted);
    }
}
