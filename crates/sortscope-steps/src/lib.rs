//! Stepwise Sorting Algorithms
//!
//! Sorting algorithms rewritten as explicit state machines so a caller can
//! pull one observable step at a time, pause anywhere, and drop the run at
//! any point without cleanup.
//!
//! # Records
//!
//! Every pull yields one of:
//! - a [`StepRecord`]: full snapshot, highlighted indices, counters
//! - the [`FinalRecord`]: sorted elements, empty highlight (exactly once)
//! - [`Pull::Exhausted`] for any pull after that
//!
//! Snapshots are independent copies and are always a permutation of the
//! input, so consumers may keep old steps around.
//!
//! # Algorithms
//!
//! | Algorithm | Steps | Counters touched |
//! |---|---|---|
//! | [`BubbleSort`] | per comparison, plus per exchange | comparisons, swaps |
//! | [`InsertionSort`] | per shift, plus per settled key | comparisons, swaps |
//! | [`MergeSort`] | per write into the working array | comparisons, writes |
//!
//! # Usage
//!
//! ```
//! use sortscope_steps::{run_to_end, Algorithm};
//!
//! let (steps, fin) = run_to_end(Algorithm::Bubble.generator(&[3, 1, 2])).unwrap();
//! assert_eq!(steps.len(), 5);
//! assert_eq!(fin.elements, vec![1, 2, 3]);
//! ```

mod algorithm;
mod bubble;
mod error;
mod insertion;
mod merge;
mod record;

pub use algorithm::{run_to_end, Algorithm, StepGenerator};
pub use bubble::BubbleSort;
pub use error::{Error, Result};
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use record::{FinalRecord, Pull, RunCounters, StepRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_only_final() {
        for algo in Algorithm::ALL {
            let mut generator = algo.generator::<u32>(&[]);
            assert_eq!(
                generator.pull(),
                Pull::Finished(FinalRecord {
                    elements: vec![],
                    highlighted: vec![],
                }),
                "{algo} should finish immediately"
            );
            assert_eq!(generator.pull(), Pull::Exhausted);
        }
    }

    #[test]
    fn single_element_yields_only_final() {
        for algo in Algorithm::ALL {
            let (steps, fin) = run_to_end(algo.generator(&[7u32])).unwrap();
            assert!(steps.is_empty(), "{algo} produced steps for one element");
            assert_eq!(fin.elements, vec![7]);
        }
    }

    #[test]
    fn only_merge_writes_and_only_merge_never_swaps() {
        let input = [5u32, 3, 9, 1, 3];
        for algo in Algorithm::ALL {
            let (steps, _) = run_to_end(algo.generator(&input)).unwrap();
            let last = steps.last().unwrap().counters;
            match algo {
                Algorithm::Merge => {
                    assert_eq!(last.swaps, 0);
                    assert!(last.writes > 0);
                }
                _ => {
                    assert_eq!(last.writes, 0);
                    assert!(last.swaps > 0);
                }
            }
        }
    }
}
