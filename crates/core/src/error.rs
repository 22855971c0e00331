//! Error kinds returned by interval sets and checkpoint resolvers

use thiserror::Error;

/// Failure of an interval set construction or a resolver query
///
/// Every variant is a caller-facing value; nothing here is retried or
/// defaulted internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// An interval set was built from zero periods
    #[error("interval set must contain at least one period")]
    EmptyIntervalSet,

    /// A period was zero or negative
    #[error("period must be positive, got {0}")]
    NonPositivePeriod(i64),

    /// The observation lies before the progression origin
    #[error("observation {0} lies before the progression origin")]
    NegativeObservation(i64),

    /// The checkpoint after the observation is past `i64::MAX`
    #[error("observation {0} is too large: next checkpoint overflows")]
    ObservationOverflow(i64),

    /// A checkpoint sequence was requested for a period outside the set
    #[error("period {0} is not part of the interval set")]
    InvalidPeriod(i64),

    /// No configured period divides the bracket bound
    ///
    /// Means the set was assembled from non-harmonic maintenance data.
    #[error("no configured period divides checkpoint {0} (non-harmonic interval set)")]
    NoApplicableInterval(i64),
}

/// Result type for interval operations
pub type Result<T, E = IntervalError> = std::result::Result<T, E>;
