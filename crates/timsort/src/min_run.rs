/// Minimum run length for an input of `n` elements.
///
/// Inputs below `min_merge` form one run. Otherwise `n` is halved until it
/// drops to `min_merge` or below, and one is added if any shifted-out bit
/// was set, so `n / min_run` lands close to, but not above, a power of two.
pub(crate) fn min_run_length(mut n: usize, min_merge: usize) -> usize {
    if n < min_merge {
        return n;
    }

    let mut r = 0usize;
    while n > min_merge {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}
