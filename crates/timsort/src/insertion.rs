use std::cmp::Ordering;

/// Sorts `v[start..end]` given that `v[start..sorted]` is already sorted.
///
/// Each element is placed after every element that does not compare greater
/// than it, so equal elements keep their input order. O(n log n) comparisons
/// and O(n^2) moves; only used on slices shorter than the min run.
pub(crate) fn binary_insertion_sort<T, E, F>(
    v: &mut [T],
    start: usize,
    sorted: usize,
    end: usize,
    compare: &mut F,
) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    debug_assert!(start < sorted && sorted <= end && end <= v.len());

    for i in sorted..end {
        let mut left = start;
        let mut right = i;
        while left < right {
            let mid = left + ((right - left) >> 1);
            if compare(&v[i], &v[mid])? == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        v[left..=i].rotate_right(1);
    }
    Ok(())
}
