use crate::run::Run;

// Enough for any slice length when run lengths grow geometrically; the
// balancing below only checks the top three entries, so `push` may still
// grow past it.
const MAX_PENDING_RUNS: usize = 85;

/// Pending runs, bottom to top in index order, tiling the scanned prefix.
pub(crate) struct RunStack {
    runs: Vec<Run>,
}

impl RunStack {
    pub fn with_bound(len: usize, min_run: usize) -> Self {
        let bound = (len / min_run.max(1) + 1).min(MAX_PENDING_RUNS);
        Self {
            runs: Vec::with_capacity(bound),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    pub fn push(&mut self, run: Run) {
        debug_assert!(
            self.runs.last().is_none_or(|top| top.end() == run.start),
            "runs must stay adjacent"
        );
        self.runs.push(run);
    }

    #[inline]
    fn pop(&mut self) -> Option<Run> {
        self.runs.pop()
    }

    /// Restores the balance of the top entries after a push.
    ///
    /// With `x` on top and `y` below it: merge them while `y` is no longer
    /// than `x`; otherwise look at a third entry `z` and, if it is no longer
    /// than `x + y`, merge `y` with whichever neighbour keeps the merge
    /// smaller (`x` when `x < z`, else `z`).
    pub fn collapse<E, M>(&mut self, merge: &mut M) -> Result<(), E>
    where
        M: FnMut(Run, Run) -> Result<(), E>,
    {
        while self.len() > 1 {
            let (Some(x), Some(y)) = (self.pop(), self.pop()) else {
                unreachable!("stack holds at least two runs");
            };

            if y.len <= x.len {
                self.merge_adjacent(x, y, merge)?;
                continue;
            }

            let Some(z) = self.pop() else {
                self.push(y);
                self.push(x);
                break;
            };

            if z.len <= x.len + y.len {
                if x.len < z.len {
                    self.push(z);
                    self.merge_adjacent(x, y, merge)?;
                } else {
                    self.merge_adjacent(z, y, merge)?;
                    self.push(x);
                }
                continue;
            }

            self.push(z);
            self.push(y);
            self.push(x);
            break;
        }
        Ok(())
    }

    /// Drains the stack into a single run, each time merging `y` with the
    /// neighbour whose length is closer to its own.
    pub fn force_collapse<E, M>(&mut self, merge: &mut M) -> Result<(), E>
    where
        M: FnMut(Run, Run) -> Result<(), E>,
    {
        while self.len() > 1 {
            let (Some(x), Some(y)) = (self.pop(), self.pop()) else {
                unreachable!("stack holds at least two runs");
            };

            let Some(z) = self.pop() else {
                self.merge_adjacent(x, y, merge)?;
                continue;
            };

            if z.len.abs_diff(y.len) < y.len.abs_diff(x.len) {
                self.merge_adjacent(z, y, merge)?;
                self.push(x);
            } else {
                self.push(z);
                self.merge_adjacent(x, y, merge)?;
            }
        }
        Ok(())
    }

    /// The single run left after [`force_collapse`](Self::force_collapse).
    pub fn into_single(mut self) -> Option<Run> {
        let run = self.pop();
        debug_assert!(self.runs.is_empty());
        run
    }

    fn merge_adjacent<E, M>(&mut self, a: Run, b: Run, merge: &mut M) -> Result<(), E>
    where
        M: FnMut(Run, Run) -> Result<(), E>,
    {
        let (lo, hi) = if a.start < b.start { (a, b) } else { (b, a) };
        debug_assert_eq!(lo.end(), hi.start);

        merge(lo, hi)?;
        self.push(Run {
            start: lo.start,
            len: lo.len + hi.len,
        });
        Ok(())
    }
}
