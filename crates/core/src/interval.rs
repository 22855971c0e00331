//! Validated, immutable sets of maintenance periods

use crate::error::{IntervalError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FusedIterator;

/// An ordered set of distinct positive periods sharing one unit
///
/// The first period passed to [`IntervalSet::new`] is the *base
/// granularity*: every bracket is computed in steps of that period, no
/// matter which other periods are present. Callers are expected to pass
/// the smallest period first. The remaining periods are kept sorted and
/// de-duplicated.
///
/// The set is immutable once built. It is `Send + Sync` and can be shared
/// freely across threads.
///
/// # Example
/// ```
/// use fleetcheck_core::IntervalSet;
///
/// let set = IntervalSet::new([5000, 10000, 20000])?;
/// assert_eq!(set.base_granularity(), 5000);
/// assert_eq!(set.largest(), 20000);
/// # Ok::<(), fleetcheck_core::IntervalError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct IntervalSet {
    /// Step size for bracket computation (first configured period)
    base: i64,
    /// All distinct periods, ascending
    periods: SmallVec<[i64; 8]>,
}

impl IntervalSet {
    /// Build a set from an ordered sequence of periods
    ///
    /// # Errors
    /// * `EmptyIntervalSet` if the sequence is empty
    /// * `NonPositivePeriod` if any period is zero or negative
    pub fn new<I>(periods: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut iter = periods.into_iter();
        let base = iter.next().ok_or(IntervalError::EmptyIntervalSet)?;
        if base <= 0 {
            return Err(IntervalError::NonPositivePeriod(base));
        }

        let mut sorted: SmallVec<[i64; 8]> = SmallVec::new();
        sorted.push(base);
        for period in iter {
            if period <= 0 {
                return Err(IntervalError::NonPositivePeriod(period));
            }
            sorted.push(period);
        }
        sorted.sort_unstable();
        sorted.dedup();

        Ok(Self {
            base,
            periods: sorted,
        })
    }

    /// The period every bracket is measured in
    pub fn base_granularity(&self) -> i64 {
        self.base
    }

    /// All distinct periods in ascending order
    pub fn periods(&self) -> &[i64] {
        &self.periods
    }

    /// The largest configured period
    pub fn largest(&self) -> i64 {
        // Never empty: construction rejects an empty sequence.
        self.periods.last().copied().unwrap_or(self.base)
    }

    /// Number of distinct periods
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Check whether `period` is a member of the set
    pub fn contains(&self, period: i64) -> bool {
        self.periods.binary_search(&period).is_ok()
    }

    /// Periods that are not integer multiples of the base granularity
    ///
    /// An empty result means the set satisfies the harmonic invariant.
    pub fn non_harmonic_periods(&self) -> impl Iterator<Item = i64> + '_ {
        let base = self.base;
        self.periods.iter().copied().filter(move |p| p % base != 0)
    }

    /// Check the harmonic invariant
    pub fn is_harmonic(&self) -> bool {
        self.non_harmonic_periods().next().is_none()
    }

    /// The largest member that evenly divides `position`, if any
    pub(crate) fn dominant_divisor(&self, position: i64) -> Option<i64> {
        self.periods
            .iter()
            .rev()
            .copied()
            .find(|p| position % p == 0)
    }

    /// Multiples of `period` from 0 up to and including the largest period
    ///
    /// The returned iterator is lazy and finite. Clone it (or call this
    /// again) to restart the sequence.
    ///
    /// # Errors
    /// * `InvalidPeriod` if `period` is not a member of the set
    pub fn all_checkpoints(&self, period: i64) -> Result<Checkpoints> {
        if !self.contains(period) {
            return Err(IntervalError::InvalidPeriod(period));
        }
        Ok(Checkpoints::new(period, self.largest()))
    }
}

impl TryFrom<Vec<i64>> for IntervalSet {
    type Error = IntervalError;

    fn try_from(periods: Vec<i64>) -> Result<Self> {
        Self::new(periods)
    }
}

impl From<IntervalSet> for Vec<i64> {
    fn from(set: IntervalSet) -> Self {
        // Base first so a round trip keeps the same base granularity.
        let mut out = Vec::with_capacity(set.periods.len());
        out.push(set.base);
        out.extend(set.periods.iter().copied().filter(|&p| p != set.base));
        out
    }
}

impl fmt::Debug for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalSet")
            .field("base", &self.base)
            .field("periods", &self.periods.as_slice())
            .finish()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, period) in self.periods.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", period)?;
        }
        write!(f, "}}")
    }
}

/// Lazy sequence of checkpoint positions `0, step, 2*step, ..., <= end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoints {
    step: i64,
    next: Option<i64>,
    end: i64,
}

impl Checkpoints {
    fn new(step: i64, end: i64) -> Self {
        Self {
            step,
            next: Some(0),
            end,
        }
    }

    /// Distance between consecutive checkpoints
    pub fn step(&self) -> i64 {
        self.step
    }
}

impl Iterator for Checkpoints {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next.filter(|&c| c <= self.end)?;
        self.next = current.checked_add(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(c) if c <= self.end => ((self.end - c) / self.step + 1) as usize,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Checkpoints {}

impl FusedIterator for Checkpoints {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_set() {
        assert_eq!(
            IntervalSet::new(Vec::<i64>::new()),
            Err(IntervalError::EmptyIntervalSet)
        );
    }

    #[test]
    fn test_rejects_non_positive_periods() {
        assert_eq!(
            IntervalSet::new([0, 5000]),
            Err(IntervalError::NonPositivePeriod(0))
        );
        assert_eq!(
            IntervalSet::new([5000, -10000]),
            Err(IntervalError::NonPositivePeriod(-10000))
        );
    }

    #[test]
    fn test_base_is_first_configured_period() {
        let set = IntervalSet::new([5000, 20000, 10000]).unwrap();
        assert_eq!(set.base_granularity(), 5000);
        assert_eq!(set.periods(), &[5000, 10000, 20000]);
        assert_eq!(set.largest(), 20000);
    }

    #[test]
    fn test_base_is_kept_even_when_not_smallest() {
        let set = IntervalSet::new([10000, 5000]).unwrap();
        assert_eq!(set.base_granularity(), 10000);
        assert_eq!(set.periods(), &[5000, 10000]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = IntervalSet::new([30, 90, 30, 365, 90]).unwrap();
        assert_eq!(set.periods(), &[30, 90, 365]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_harmonic_detection() {
        let harmonic = IntervalSet::new([5000, 10000, 20000]).unwrap();
        assert!(harmonic.is_harmonic());

        let broken = IntervalSet::new([5000, 7500, 20000]).unwrap();
        assert!(!broken.is_harmonic());
        assert_eq!(broken.non_harmonic_periods().collect::<Vec<_>>(), vec![7500]);
    }

    #[test]
    fn test_dominant_divisor_picks_largest() {
        let set = IntervalSet::new([5000, 10000, 20000]).unwrap();
        assert_eq!(set.dominant_divisor(20000), Some(20000));
        assert_eq!(set.dominant_divisor(30000), Some(10000));
        assert_eq!(set.dominant_divisor(25000), Some(5000));
        assert_eq!(set.dominant_divisor(2500), None);
    }

    #[test]
    fn test_all_checkpoints_inclusive_upper_bound() {
        let set = IntervalSet::new([5000, 10000, 20000]).unwrap();

        let base: Vec<_> = set.all_checkpoints(5000).unwrap().collect();
        assert_eq!(base, vec![0, 5000, 10000, 15000, 20000]);

        let major: Vec<_> = set.all_checkpoints(20000).unwrap().collect();
        assert_eq!(major, vec![0, 20000]);
    }

    #[test]
    fn test_all_checkpoints_rejects_foreign_period() {
        let set = IntervalSet::new([5000, 10000]).unwrap();
        assert_eq!(
            set.all_checkpoints(7000).unwrap_err(),
            IntervalError::InvalidPeriod(7000)
        );
    }

    #[test]
    fn test_all_checkpoints_is_restartable() {
        let set = IntervalSet::new([30, 90, 365]).unwrap();
        let seq = set.all_checkpoints(90).unwrap();

        assert_eq!(seq.len(), 5);
        let first: Vec<_> = seq.clone().collect();
        let second: Vec<_> = seq.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0, 90, 180, 270, 360]);
    }

    #[test]
    fn test_checkpoints_fused_after_end() {
        let set = IntervalSet::new([5]).unwrap();
        let mut seq = set.all_checkpoints(5).unwrap();
        assert_eq!(seq.next(), Some(0));
        assert_eq!(seq.next(), Some(5));
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_checkpoints_do_not_overflow() {
        let set = IntervalSet::new([i64::MAX]).unwrap();
        let seq: Vec<_> = set.all_checkpoints(i64::MAX).unwrap().collect();
        assert_eq!(seq, vec![0, i64::MAX]);
    }

    #[test]
    fn test_display() {
        let set = IntervalSet::new([5000, 10000, 20000]).unwrap();
        assert_eq!(set.to_string(), "{5000, 10000, 20000}");
    }

    #[test]
    fn test_serde_validates_and_keeps_base() {
        let set: IntervalSet = serde_json::from_str("[90, 30, 365]").unwrap();
        assert_eq!(set.base_granularity(), 90);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[90,30,365]");

        assert!(serde_json::from_str::<IntervalSet>("[]").is_err());
        assert!(serde_json::from_str::<IntervalSet>("[30, 0]").is_err());
    }
}
