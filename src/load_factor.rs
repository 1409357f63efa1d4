//! Load-factor configuration and table sizing constants.

use crate::error::{Error, Result};

/// Number of buckets a fresh table starts with; the table never shrinks
/// below this.
pub const MIN_CAPACITY: usize = 16;

pub const DEFAULT_LOWER_LOAD_FACTOR: f64 = 0.25;
pub const DEFAULT_UPPER_LOAD_FACTOR: f64 = 0.75;

/// Validated `(lower, upper)` pair driving resize decisions.
///
/// The table doubles when `len / capacity` rises strictly above `upper`
/// after an insert, and halves when it falls strictly below `lower` after a
/// removal (never below [`MIN_CAPACITY`]).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadFactors {
    lower: f64,
    upper: f64,
}

impl LoadFactors {
    /// Fails with [`Error::InvalidConfiguration`] unless
    /// `0 < lower < upper < 1`. NaN bounds are rejected.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        // Written as a negated conjunction so NaN falls into the error arm.
        if !(lower > 0.0 && upper < 1.0 && lower < upper) {
            log::debug!("rejecting load factors lower={lower} upper={upper}");
            return Err(Error::InvalidConfiguration { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub(crate) fn should_grow(&self, len: usize, capacity: usize) -> bool {
        ratio(len, capacity) > self.upper
    }

    pub(crate) fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        capacity > MIN_CAPACITY && ratio(len, capacity) < self.lower
    }
}

impl Default for LoadFactors {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_LOAD_FACTOR,
            upper: DEFAULT_UPPER_LOAD_FACTOR,
        }
    }
}

#[inline]
pub(crate) fn ratio(len: usize, capacity: usize) -> f64 {
    len as f64 / capacity as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordered_bounds() {
        let lf = LoadFactors::new(0.25, 0.5).unwrap();
        assert_eq!(lf.lower(), 0.25);
        assert_eq!(lf.upper(), 0.5);
    }

    /// Invariant: every bound outside `0 < lower < upper < 1` is rejected
    /// with the offending values echoed back.
    #[test]
    fn rejects_out_of_range_bounds() {
        for (lower, upper) in [
            (0.0, 0.5),
            (-0.1, 0.5),
            (0.25, 1.0),
            (0.25, 1.5),
            (0.5, 0.5),
            (0.75, 0.25),
        ] {
            match LoadFactors::new(lower, upper) {
                Err(Error::InvalidConfiguration { lower: l, upper: u }) => {
                    assert_eq!((l, u), (lower, upper));
                }
                other => panic!("expected rejection for ({lower}, {upper}): {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_nan() {
        assert!(LoadFactors::new(f64::NAN, 0.5).is_err());
        assert!(LoadFactors::new(0.25, f64::NAN).is_err());
    }

    #[test]
    fn default_is_quarter_to_three_quarters() {
        let lf = LoadFactors::default();
        assert_eq!(lf.lower(), DEFAULT_LOWER_LOAD_FACTOR);
        assert_eq!(lf.upper(), DEFAULT_UPPER_LOAD_FACTOR);
    }

    /// Invariant: both thresholds are exclusive.
    #[test]
    fn thresholds_are_strict() {
        let lf = LoadFactors::new(0.25, 0.5).unwrap();
        assert!(!lf.should_grow(8, 16));
        assert!(lf.should_grow(9, 16));
        assert!(!lf.should_shrink(8, 32));
        assert!(lf.should_shrink(7, 32));
        // Floor: never shrink the initial table.
        assert!(!lf.should_shrink(0, MIN_CAPACITY));
    }
}
