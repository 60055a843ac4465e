use thiserror::Error;

pub type Result<T> = std::result::Result<T, MzQueryError>;

/// Top-level error type for the crate.
///
/// Every public entry point validates its inputs before touching the
/// experiment, so any of these aborts the whole call with no partial
/// output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MzQueryError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),
    #[error(transparent)]
    UnsupportedAggregation(#[from] UnsupportedAggregationError),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),
}

/// Raised while validating a range matrix.
///
/// Each variant names the offending row so a caller submitting a few
/// thousand windows can find the bad one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRangeError {
    #[error("range {row}: expected mz_min <= mz_max, got ({mz_min}, {mz_max})")]
    InvertedMzBounds { row: usize, mz_min: f64, mz_max: f64 },
    #[error("range {row}: expected rt_min <= rt_max, got ({rt_min}, {rt_max})")]
    InvertedRtBounds { row: usize, rt_min: f64, rt_max: f64 },
    #[error("range {row}: bounds must be finite, got {value}")]
    NonFiniteBound { row: usize, value: f64 },
    #[error("expected a dense matrix with {expected} columns, got a flat slice of length {len}")]
    MalformedMatrix { len: usize, expected: usize },
}

/// Raised when an aggregation mode token is not one of the supported
/// literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported aggregation mode {mode:?}, expected one of: sum, max, min, mean")]
pub struct UnsupportedAggregationError {
    pub mode: String,
}

/// Raised when max/min aggregation is asked to reduce zero intensities.
///
/// This never crosses the crate boundary: extraction converts it into a
/// zero intensity for the affected spectrum-range pair. It is therefore
/// not a variant of [`MzQueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot aggregate an empty set of intensities")]
pub struct EmptyAggregationError;

/// Parameter misuse on an otherwise well-formed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidParameterError {
    #[error("max_traces must be at least 1, got {got}")]
    NonPositiveMaxTraces { got: usize },
    #[error("ms_level must be at least 1")]
    ZeroMsLevel,
}
