use thiserror::Error;

use crate::data_source::SourceError;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptySymbol,
    #[error("ticker length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("currency must be a 3-letter ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp {value} is outside the supported calendar range")]
    TimestampOutOfRange { value: i64 },
    #[error("date arithmetic left the supported calendar range")]
    DateOutOfRange,
    #[error("range start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("series days must be strictly ascending (violation at index {index})")]
    NonAscendingSeries { index: usize },
}

/// Caller-facing classification of an alignment failure.
///
/// `InvalidInput` is a caller error (4xx-equivalent); `SourceUnavailable`
/// means an upstream fetch failed or returned garbage (5xx-equivalent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignErrorKind {
    InvalidInput,
    SourceUnavailable,
}

/// Error returned by [`SeriesAligner::align`](crate::aligner::SeriesAligner::align).
///
/// Upstream failures keep their cause on the error chain for logging, but
/// the `Display` message stays generic so provider details never reach the
/// caller.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ValidationError),

    /// A source request was rejected before it left the process.
    #[error("invalid request: {cause}")]
    InvalidRequest { cause: SourceError },

    #[error("upstream fetch failed")]
    SourceUnavailable {
        #[source]
        cause: SourceError,
    },
}

impl AlignError {
    pub const fn kind(&self) -> AlignErrorKind {
        match self {
            Self::MissingParameter(_)
            | Self::InvalidParameter(_)
            | Self::InvalidRequest { .. } => AlignErrorKind::InvalidInput,
            Self::SourceUnavailable { .. } => AlignErrorKind::SourceUnavailable,
        }
    }
}
