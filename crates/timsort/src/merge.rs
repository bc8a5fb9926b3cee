use std::cmp::Ordering;
use std::ptr;

use crate::run::Run;

/// Merges adjacent runs, copying the lower run out to a reusable buffer.
pub(crate) struct Merger<T> {
    // Only its spare capacity is used; the length stays 0 so it never owns
    // elements.
    buf: Vec<T>,
    gallop_threshold: usize,
    pub merges: usize,
    pub gallops: usize,
}

impl<T> Merger<T> {
    pub fn new(gallop_threshold: usize) -> Self {
        Self {
            buf: Vec::new(),
            gallop_threshold,
            merges: 0,
            gallops: 0,
        }
    }

    /// Merges `v[lo.start..hi.end()]`, where `lo` and `hi` are sorted and
    /// `lo` ends where `hi` starts.
    ///
    /// The lower run wins ties, so equal elements keep their input order.
    /// Once one side has won `gallop_threshold` picks in a row, a binary
    /// search finds how many more of its elements precede the other side's
    /// head and copies them in one go.
    ///
    /// If `compare` fails or panics, `v` still holds every element exactly
    /// once, in unspecified order.
    pub fn merge<E, F>(&mut self, v: &mut [T], lo: Run, hi: Run, compare: &mut F) -> Result<(), E>
    where
        F: FnMut(&T, &T) -> Result<Ordering, E>,
    {
        assert!(lo.len > 0 && hi.len > 0 && lo.end() == hi.start && hi.end() <= v.len());
        debug_assert!(size_of::<T>() > 0);

        tracing::trace!(
            lo_start = lo.start,
            lo_len = lo.len,
            hi_len = hi.len,
            "merging runs"
        );
        self.merges += 1;

        self.buf.reserve(lo.len);
        let threshold = self.gallop_threshold;

        // SAFETY: `buf` has room for `lo.len` elements and does not alias `v`;
        // all pointers stay within `v[lo.start..hi.end()]` or `buf[..lo.len]`.
        // `hole` keeps `v` whole: the unconsumed part of `buf` always matches
        // the gap between the output cursor and the high cursor, and dropping
        // `hole` (on return, error or panic) fills that gap.
        unsafe {
            let base = v.as_mut_ptr();
            let buf = self.buf.as_mut_ptr();
            ptr::copy_nonoverlapping(base.add(lo.start), buf, lo.len);

            let mut hole = MergeHole {
                start: buf,
                end: buf.add(lo.len),
                dst: base.add(lo.start),
            };
            let mut right = base.add(hi.start);
            let right_end = base.add(hi.end());

            let mut lo_wins = 0usize;
            let mut hi_wins = 0usize;

            while hole.start < hole.end && right < right_end {
                if compare(&*right, &*hole.start)? == Ordering::Less {
                    ptr::copy_nonoverlapping(right, hole.dst, 1);
                    right = right.add(1);
                    hi_wins += 1;
                    lo_wins = 0;
                } else {
                    ptr::copy_nonoverlapping(hole.start, hole.dst, 1);
                    hole.start = hole.start.add(1);
                    lo_wins += 1;
                    hi_wins = 0;
                }
                hole.dst = hole.dst.add(1);

                if lo_wins >= threshold && right < right_end {
                    let remaining = hole.end.offset_from(hole.start) as usize;
                    let count = gallop(hole.start, remaining, &*right, compare)?;
                    ptr::copy_nonoverlapping(hole.start, hole.dst, count);
                    hole.start = hole.start.add(count);
                    hole.dst = hole.dst.add(count);
                    self.gallops += 1;
                    lo_wins = 0;
                    hi_wins = 0;
                }

                if hi_wins >= threshold && hole.start < hole.end {
                    let remaining = right_end.offset_from(right) as usize;
                    let count = gallop(right, remaining, &*hole.start, compare)?;
                    // The source may overlap the output when `count` exceeds
                    // the gap between them.
                    ptr::copy(right, hole.dst, count);
                    right = right.add(count);
                    hole.dst = hole.dst.add(count);
                    self.gallops += 1;
                    lo_wins = 0;
                    hi_wins = 0;
                }
            }
        }
        // Any rest of the high run is already in place; `hole` moved the
        // rest of the low run behind the output cursor when it dropped.
        Ok(())
    }
}

/// Number of leading elements of `run[..len]` that compare less than
/// `target`.
///
/// # Safety
///
/// `run` must be valid for `len` reads.
unsafe fn gallop<T, E, F>(run: *const T, len: usize, target: &T, compare: &mut F) -> Result<usize, E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let mut left = 0usize;
    let mut right = len;
    while left < right {
        let mid = left + ((right - left) >> 1);
        // SAFETY: `mid < len`.
        let probe = unsafe { &*run.add(mid) };
        if compare(probe, target)? == Ordering::Less {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    Ok(left)
}

// When dropped, copies `start..end` to `dst..`.
struct MergeHole<T> {
    start: *mut T,
    end: *mut T,
    dst: *mut T,
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: `start..end` is the unconsumed tail of the merge buffer and
        // `dst` points at exactly that many vacated slots in the slice.
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dst, len);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn natural<K: Ord>(a: &K, b: &K) -> Result<Ordering, Infallible> {
        Ok(a.cmp(b))
    }

    fn merge_halves<K: Ord>(data: &mut [K], mid: usize, threshold: usize) -> Merger<K> {
        let mut merger = Merger::new(threshold);
        let lo = Run { start: 0, len: mid };
        let hi = Run {
            start: mid,
            len: data.len() - mid,
        };
        merger.merge(data, lo, hi, &mut natural).unwrap();
        merger
    }

    #[test]
    fn interleaved_runs() {
        let mut data = vec![1, 3, 5, 7, 2, 4, 6, 8];
        let merger = merge_halves(&mut data, 4, 7);
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(merger.merges, 1);
        assert_eq!(merger.gallops, 0);
    }

    #[test]
    fn merges_only_the_given_range() {
        let mut data = vec![9, 4, 6, 1, 5, 0];
        let mut merger = Merger::new(7);
        let lo = Run { start: 1, len: 2 };
        let hi = Run { start: 3, len: 2 };
        merger.merge(&mut data, lo, hi, &mut natural).unwrap();
        assert_eq!(data, vec![9, 1, 4, 5, 6, 0]);
    }

    #[test]
    fn ties_favor_the_lower_run() {
        let mut data = vec![(1, 'a'), (2, 'b'), (2, 'c'), (1, 'd'), (2, 'e'), (3, 'f')];
        let mut merger = Merger::new(7);
        let lo = Run { start: 0, len: 3 };
        let hi = Run { start: 3, len: 3 };
        let mut by_key = |a: &(i32, char), b: &(i32, char)| Ok::<_, Infallible>(a.0.cmp(&b.0));
        merger.merge(&mut data, lo, hi, &mut by_key).unwrap();
        assert_eq!(
            data,
            vec![(1, 'a'), (1, 'd'), (2, 'b'), (2, 'c'), (2, 'e'), (3, 'f')]
        );
    }

    #[test]
    fn gallops_through_a_long_low_stretch() {
        let mut data: Vec<u32> = (0..1000).collect();
        data.push(5000);
        data.extend(500..1500);
        let mid = 1001;
        let merger = merge_halves(&mut data, mid, 7);

        let mut expected: Vec<u32> = (0..1000).chain(500..1500).chain([5000]).collect();
        expected.sort();
        assert_eq!(data, expected);
        assert!(merger.gallops > 0);
    }

    #[test]
    fn gallops_through_a_long_high_stretch() {
        let mut data: Vec<u32> = (1000..1010).collect();
        data.extend(0..2000);
        let merger = merge_halves(&mut data, 10, 7);

        let mut expected: Vec<u32> = (1000..1010).chain(0..2000).collect();
        expected.sort();
        assert_eq!(data, expected);
        assert!(merger.gallops > 0);
    }

    #[test]
    fn high_gallop_keeps_equal_elements_stable() {
        // Low run: ten copies of key 50; high run: 0..100 with key 50 twice.
        let mut data: Vec<(u32, u32)> = (0..10).map(|i| (50, i)).collect();
        data.extend((0..100).map(|k| (k, 100 + k)));
        data.push((50, 999));
        data[10..].sort_by_key(|p| p.0);

        let mut expected = data.clone();
        expected.sort_by_key(|p| p.0);

        let mut merger = Merger::new(3);
        let lo = Run { start: 0, len: 10 };
        let hi = Run {
            start: 10,
            len: data.len() - 10,
        };
        let mut by_key = |a: &(u32, u32), b: &(u32, u32)| Ok::<_, Infallible>(a.0.cmp(&b.0));
        merger.merge(&mut data, lo, hi, &mut by_key).unwrap();
        assert_eq!(data, expected);
        assert!(merger.gallops > 0);
    }

    #[test]
    fn threshold_one_still_merges_correctly() {
        let mut data = vec![0, 2, 2, 4, 9, 1, 2, 3, 3, 10];
        merge_halves(&mut data, 5, 1);
        assert_eq!(data, vec![0, 1, 2, 2, 2, 3, 3, 4, 9, 10]);
    }

    #[test]
    fn comparator_error_leaves_a_permutation() {
        let original: Vec<String> = (0..40).map(|i| format!("{:03}", (i * 7) % 40)).collect();
        let mut data = original.clone();
        data[..20].sort();
        data[20..].sort();

        let mut merger = Merger::new(7);
        let mut calls = 0;
        let mut failing = |a: &String, b: &String| {
            calls += 1;
            if calls == 12 { Err(calls) } else { Ok(a.cmp(b)) }
        };
        let lo = Run { start: 0, len: 20 };
        let hi = Run { start: 20, len: 20 };
        assert_eq!(merger.merge(&mut data, lo, hi, &mut failing), Err(12));

        let mut seen = data.clone();
        seen.sort();
        let mut expected = original;
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn comparator_panic_leaves_a_permutation() {
        let mut data: Vec<String> = (0..30).map(|i| format!("{:02}", (i * 11) % 30)).collect();
        data[..15].sort();
        data[15..].sort();
        let mut expected = data.clone();
        expected.sort();

        let mut merger = Merger::new(2);
        let mut calls = 0;
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut panicking = |a: &String, b: &String| -> Result<Ordering, Infallible> {
                calls += 1;
                if calls == 9 {
                    panic!("comparator gave up");
                }
                Ok(a.cmp(b))
            };
            let lo = Run { start: 0, len: 15 };
            let hi = Run { start: 15, len: 15 };
            merger.merge(&mut data, lo, hi, &mut panicking)
        }));
        assert!(result.is_err());

        data.sort();
        assert_eq!(data, expected);
    }

    #[test]
    fn buffer_is_reused_across_merges() {
        let mut merger = Merger::new(7);
        let mut data: Vec<u64> = (0..64).rev().collect();
        data[..32].sort();
        data[32..].sort();
        let lo = Run { start: 0, len: 32 };
        let hi = Run { start: 32, len: 32 };
        merger.merge(&mut data, lo, hi, &mut natural).unwrap();
        let capacity = merger.buf.capacity();

        data[..16].reverse();
        data[..8].sort();
        data[8..16].sort();
        let lo = Run { start: 0, len: 8 };
        let hi = Run { start: 8, len: 8 };
        merger.merge(&mut data, lo, hi, &mut natural).unwrap();
        assert_eq!(merger.buf.capacity(), capacity);
        assert!(merger.buf.is_empty());
        assert!(data.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(merger.merges, 2);
    }
}
