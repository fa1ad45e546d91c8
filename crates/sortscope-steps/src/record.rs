//! Step and final records, plus the run-scoped counters they carry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cumulative operation counts for a single run.
///
/// A fresh context starts at zero when a generator is created and only ever
/// grows while the generator is pulled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunCounters {
    /// Element comparisons performed so far
    pub comparisons: u64,
    /// Exchanges (bubble) or shifts (insertion) performed so far
    pub swaps: u64,
    /// Writes into the working array from merge buffers so far
    pub writes: u64,
}

impl RunCounters {
    /// True if every counter in `self` is at least its value in `earlier`.
    pub fn dominates(&self, earlier: &RunCounters) -> bool {
        self.comparisons >= earlier.comparisons
            && self.swaps >= earlier.swaps
            && self.writes >= earlier.writes
    }
}

/// One observable instant of a running algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepRecord<T> {
    /// Independent copy of the working array
    pub elements: Vec<T>,
    /// Indices under comparison or write, all `< elements.len()`
    pub highlighted: Vec<usize>,
    /// Counters as of this step
    pub counters: RunCounters,
}

/// The sorted result, produced once when a generator completes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FinalRecord<T> {
    /// Fully sorted elements
    pub elements: Vec<T>,
    /// Always empty
    pub highlighted: Vec<usize>,
}

/// Outcome of pulling a generator once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull<T> {
    /// An intermediate step; more records follow.
    Step(StepRecord<T>),
    /// The terminal record. Returned exactly once.
    Finished(FinalRecord<T>),
    /// The generator already yielded its terminal record.
    Exhausted,
}

impl<T> Pull<T> {
    /// Returns the step record, if this pull produced one.
    pub fn into_step(self) -> Option<StepRecord<T>> {
        match self {
            Pull::Step(step) => Some(step),
            _ => None,
        }
    }

    /// True for [`Pull::Finished`] and [`Pull::Exhausted`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Pull::Step(_))
    }
}

/// Working array, counters and completion flag shared by every generator.
#[derive(Debug, Clone)]
pub(crate) struct Workspace<T> {
    pub(crate) elements: Vec<T>,
    pub(crate) counters: RunCounters,
    finished: bool,
}

impl<T: Clone> Workspace<T> {
    pub(crate) fn new(input: &[T]) -> Self {
        Self {
            elements: input.to_vec(),
            counters: RunCounters::default(),
            finished: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Snapshot the working array with the given highlight.
    pub(crate) fn step(&self, highlighted: &[usize]) -> Pull<T> {
        debug_assert!(
            highlighted.iter().all(|&idx| idx < self.elements.len()),
            "highlight {highlighted:?} out of bounds for {} elements",
            self.elements.len()
        );
        Pull::Step(StepRecord {
            elements: self.elements.clone(),
            highlighted: highlighted.to_vec(),
            counters: self.counters,
        })
    }

    /// Yield the final record the first time, `Exhausted` afterwards.
    pub(crate) fn finish(&mut self) -> Pull<T> {
        if self.finished {
            return Pull::Exhausted;
        }
        self.finished = true;
        Pull::Finished(FinalRecord {
            elements: self.elements.clone(),
            highlighted: Vec::new(),
        })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_is_one_shot() {
        let mut ws = Workspace::new(&[2, 1]);
        match ws.finish() {
            Pull::Finished(fin) => {
                assert_eq!(fin.elements, vec![2, 1]);
                assert!(fin.highlighted.is_empty());
            }
            other => panic!("expected final record, got {other:?}"),
        }
        assert_eq!(ws.finish(), Pull::Exhausted);
        assert_eq!(ws.finish(), Pull::Exhausted);
    }

    #[test]
    fn step_snapshot_is_independent() {
        let mut ws = Workspace::new(&[1, 2, 3]);
        let step = ws.step(&[0]).into_step().unwrap();
        ws.elements[0] = 9;
        assert_eq!(step.elements, vec![1, 2, 3]);
    }

    #[test]
    fn counters_dominance() {
        let a = RunCounters { comparisons: 2, swaps: 1, writes: 0 };
        let b = RunCounters { comparisons: 3, swaps: 1, writes: 0 };
        assert!(b.dominates(&a));
        assert!(!a.dominates(&b));
        assert!(a.dominates(&a));
    }
}
