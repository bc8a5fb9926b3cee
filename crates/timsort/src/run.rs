use std::cmp::Ordering;

use crate::insertion::binary_insertion_sort;

/// A sorted, ascending region `v[start..start + len]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Run {
    pub start: usize,
    pub len: usize,
}

impl Run {
    #[inline]
    pub fn end(self) -> usize {
        self.start + self.len
    }
}

/// Length of the monotonic run starting at `start`, reversed in place if it
/// was descending.
///
/// Ascending runs accept equal neighbours; descending runs must be strictly
/// decreasing, so reversing them never reorders equal elements.
pub(crate) fn count_run_and_make_ascending<T, E, F>(
    v: &mut [T],
    start: usize,
    compare: &mut F,
) -> Result<usize, E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let n = v.len();
    let mut end = start + 1;
    if end >= n {
        return Ok(n - start);
    }

    if compare(&v[end], &v[start])? == Ordering::Less {
        end += 1;
        while end < n && compare(&v[end], &v[end - 1])? == Ordering::Less {
            end += 1;
        }
        v[start..end].reverse();
    } else {
        end += 1;
        while end < n && compare(&v[end], &v[end - 1])? != Ordering::Less {
            end += 1;
        }
    }

    Ok(end - start)
}

/// Detects the run at `start` and pads it to `min_run` elements (or to the
/// end of the slice) with binary insertion sort.
pub(crate) fn next_run<T, E, F>(
    v: &mut [T],
    start: usize,
    min_run: usize,
    compare: &mut F,
) -> Result<Run, E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let natural = count_run_and_make_ascending(v, start, compare)?;
    let remaining = v.len() - start;

    let mut len = natural;
    if natural < min_run {
        len = remaining.min(min_run);
        binary_insertion_sort(v, start, start + natural, start + len, compare)?;
    }

    Ok(Run { start, len })
}
