use std::error::Error;
use std::fmt::{Display, Formatter, Result};

/// Errors reported by the sorter itself.
///
/// Errors raised by a caller-supplied comparator through
/// [`try_sort_by`](crate::try_sort_by) are not wrapped here; they reach the
/// caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// Two elements had no order relation (e.g. a NaN met another float).
    MissingOrder,

    /// The min-merge threshold is too small to form runs.
    InvalidMinMerge {
        /// Threshold provided.
        got: usize,
        /// Smallest accepted threshold.
        min: usize,
    },

    /// Galloping needs at least one consecutive win to trigger.
    InvalidGallopThreshold(usize),
}

impl Display for SortError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SortError::MissingOrder => {
                write!(f, "Elements have no natural order; supply a comparator")
            }
            SortError::InvalidMinMerge { got, min } => {
                write!(f, "Invalid min merge threshold: {got} (must be at least {min})")
            }
            SortError::InvalidGallopThreshold(got) => {
                write!(f, "Invalid gallop threshold: {got} (must be at least 1)")
            }
        }
    }
}

impl Error for SortError {}
