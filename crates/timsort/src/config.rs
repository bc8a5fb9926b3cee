use crate::SortError;

/// Tuning knobs of the sorter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Inputs shorter than this are sorted as a single run; longer inputs
    /// get a min run derived by halving the length down to this bound.
    pub min_merge: usize,
    /// Consecutive wins of one side of a merge before it switches to
    /// binary-search bulk copies.
    pub gallop_threshold: usize,
}

impl Config {
    pub const DEFAULT: Config = Config {
        min_merge: 64,
        gallop_threshold: 7,
    };

    const MIN_MERGE_FLOOR: usize = 2;

    pub fn validate(&self) -> Result<(), SortError> {
        if self.min_merge < Self::MIN_MERGE_FLOOR {
            return Err(SortError::InvalidMinMerge {
                got: self.min_merge,
                min: Self::MIN_MERGE_FLOOR,
            });
        }
        if self.gallop_threshold == 0 {
            return Err(SortError::InvalidGallopThreshold(self.gallop_threshold));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default(), Config::DEFAULT);
        assert_eq!(Config::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_values() {
        let tiny = Config {
            min_merge: 1,
            ..Config::DEFAULT
        };
        assert_eq!(
            tiny.validate(),
            Err(SortError::InvalidMinMerge { got: 1, min: 2 })
        );

        let no_gallop = Config {
            gallop_threshold: 0,
            ..Config::DEFAULT
        };
        assert_eq!(
            no_gallop.validate(),
            Err(SortError::InvalidGallopThreshold(0))
        );
    }
}
