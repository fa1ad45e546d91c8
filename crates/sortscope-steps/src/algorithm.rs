//! The generator trait and the closed set of algorithms.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bubble::BubbleSort;
use crate::error::Error;
use crate::insertion::InsertionSort;
use crate::merge::MergeSort;
use crate::record::{FinalRecord, Pull, RunCounters, StepRecord};

/// A sorting run that can be suspended between any two steps.
///
/// Each call to [`pull`](StepGenerator::pull) does exactly the work needed to
/// produce one record and then returns. A generator holds nothing but its own
/// working copy, so dropping it mid-run is always safe.
pub trait StepGenerator<T>: Send {
    /// Produce the next record.
    fn pull(&mut self) -> Pull<T>;

    /// Counters as of the most recent record.
    fn counters(&self) -> RunCounters;

    /// Which algorithm this generator runs.
    fn algorithm(&self) -> Algorithm;

    /// True once the final record has been handed out.
    fn is_exhausted(&self) -> bool;
}

impl<T, G: StepGenerator<T> + ?Sized> StepGenerator<T> for Box<G> {
    fn pull(&mut self) -> Pull<T> {
        (**self).pull()
    }

    fn counters(&self) -> RunCounters {
        (**self).counters()
    }

    fn algorithm(&self) -> Algorithm {
        (**self).algorithm()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// Supported sorting algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Adjacent exchanges with a shrinking window
    #[default]
    Bubble,
    /// Shift each key left into the sorted prefix
    Insertion,
    /// Top-down merge, left-biased on ties
    Merge,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Insertion, Algorithm::Merge];

    /// Stable identifier used by control surfaces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
        }
    }

    /// Instantiate a generator over a private copy of `input`.
    pub fn generator<T>(self, input: &[T]) -> Box<dyn StepGenerator<T>>
    where
        T: Ord + Clone + Send + 'static,
    {
        match self {
            Algorithm::Bubble => Box::new(BubbleSort::new(input)),
            Algorithm::Insertion => Box::new(InsertionSort::new(input)),
            Algorithm::Merge => Box::new(MergeSort::new(input)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.as_str() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Pull a generator until it finishes, collecting every step.
///
/// Returns `None` for a generator that was already exhausted, since its final
/// record has been handed out before.
pub fn run_to_end<T, G>(mut generator: G) -> Option<(Vec<StepRecord<T>>, FinalRecord<T>)>
where
    G: StepGenerator<T>,
{
    let mut steps = Vec::new();
    loop {
        match generator.pull() {
            Pull::Step(step) => steps.push(step),
            Pull::Finished(fin) => return Some((steps, fin)),
            Pull::Exhausted => return None,
        }
    }
}
