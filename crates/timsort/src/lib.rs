mod config;
mod error;
mod insertion;
mod merge;
mod min_run;
mod run;
mod stack;

use std::cmp::Ordering;
use std::convert::Infallible;

pub use config::Config;
pub use error::SortError;

use merge::Merger;
use min_run::min_run_length;
use stack::RunStack;

/// Work done by one sort.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SortStats {
    pub len: usize,
    pub min_run: usize,
    /// Runs pushed onto the merge stack, after padding to `min_run`.
    pub runs: usize,
    pub merges: usize,
    /// Binary-search bulk copies taken during merges.
    pub gallops: usize,
    pub comparisons: u64,
}

/// Stable, adaptive merge sort with a fixed [`Config`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TimSort {
    config: Config,
}

impl TimSort {
    pub fn new(config: Config) -> Result<Self, SortError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn sort<T: Ord>(&self, v: &mut [T]) -> SortStats {
        self.sort_by(v, T::cmp)
    }

    pub fn sort_by<T, F>(&self, v: &mut [T], mut compare: F) -> SortStats
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let result = self.try_sort_by(v, |a, b| Ok::<_, Infallible>(compare(a, b)));
        match result {
            Ok(stats) => stats,
            Err(never) => match never {},
        }
    }

    /// Sorts `v` with a fallible comparator.
    ///
    /// The first error aborts the sort and is returned as is; `v` is then
    /// left in an unspecified order but still holds every element once.
    pub fn try_sort_by<T, E, F>(&self, v: &mut [T], mut compare: F) -> Result<SortStats, E>
    where
        F: FnMut(&T, &T) -> Result<Ordering, E>,
    {
        let len = v.len();
        let mut stats = SortStats {
            len,
            ..SortStats::default()
        };
        if len < 2 || size_of::<T>() == 0 {
            stats.runs = usize::from(len > 0);
            return Ok(stats);
        }

        let mut comparisons = 0u64;
        let mut counted = |a: &T, b: &T| {
            comparisons += 1;
            compare(a, b)
        };

        let min_run = min_run_length(len, self.config.min_merge);
        let mut stack = RunStack::with_bound(len, min_run);
        let mut merger = Merger::new(self.config.gallop_threshold);
        stats.min_run = min_run;

        let mut start = 0usize;
        while start < len {
            let run = run::next_run(v, start, min_run, &mut counted)?;
            stack.push(run);
            stats.runs += 1;
            stack.collapse(&mut |lo, hi| merger.merge(v, lo, hi, &mut counted))?;
            start = run.end();
        }
        stack.force_collapse(&mut |lo, hi| merger.merge(v, lo, hi, &mut counted))?;
        debug_assert_eq!(
            stack.into_single(),
            Some(run::Run { start: 0, len })
        );

        stats.merges = merger.merges;
        stats.gallops = merger.gallops;
        stats.comparisons = comparisons;

        tracing::debug!(
            len = stats.len,
            min_run = stats.min_run,
            runs = stats.runs,
            merges = stats.merges,
            gallops = stats.gallops,
            comparisons = stats.comparisons,
            "sorted"
        );
        Ok(stats)
    }
}

/// Sorts `v` by the natural order of `T`. Stable.
pub fn sort<T: Ord>(v: &mut [T]) {
    TimSort::default().sort(v);
}

/// Sorts `v` with `compare`, which must be a total order. Stable.
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    TimSort::default().sort_by(v, compare);
}

/// Sorts `v` by the key `f` extracts. Stable; `f` runs once per comparison
/// side.
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    sort_by(v, |a, b| f(a).cmp(&f(b)));
}

/// Sorts `v` with a comparator that may fail; the first error is returned
/// unchanged.
pub fn try_sort_by<T, E, F>(v: &mut [T], compare: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    TimSort::default().try_sort_by(v, compare).map(|_| ())
}

/// Sorts `v` by its partial order, failing with [`SortError::MissingOrder`]
/// as soon as two elements turn out to be incomparable.
pub fn try_sort<T: PartialOrd>(v: &mut [T]) -> Result<(), SortError> {
    try_sort_by(v, |a, b| a.partial_cmp(b).ok_or(SortError::MissingOrder))
}
