use thiserror::Error;

use crate::{
    prelude::Duration,
    quantity::Dimension,
};

/// Reason why no [PassTrack](crate::prelude::PassTrack) could be produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoPassCause {
    /// No rise above the horizon within this search horizon
    SearchHorizon(Duration),
    /// The pass did not set before this many samples were collected
    SampleLimit(usize),
    /// Wall clock budget elapsed
    Timeout,
}

impl std::fmt::Display for NoPassCause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SearchHorizon(horizon) => write!(f, "no rise within {}", horizon),
            Self::SampleLimit(max) => write!(f, "pass still visible after {} samples", max),
            Self::Timeout => write!(f, "prediction timed out"),
        }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// A [Quantity](crate::prelude::Quantity) of the wrong physical dimension
    /// was presented to a typed slot or a conversion.
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch {
        expected: Dimension,
        found: Dimension,
    },

    /// Input accepted dimension-wise, but outside of its physical domain.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// The elevation / altitude combination has no spherical triangle solution:
    /// the satellite cannot be seen at that elevation.
    #[error("unreachable geometry: asin argument {0} outside [-1, 1]")]
    Geometry(f64),

    /// A calculation step produced a non finite value.
    #[error("non finite {0}")]
    NonFinite(&'static str),

    /// Pass prediction gave up. See [NoPassCause].
    #[error("no pass found: {0}")]
    NoPassFound(NoPassCause),

    /// Pass prediction was cancelled by the caller.
    #[error("pass prediction cancelled")]
    Cancelled,

    /// Malformed two line element set.
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),

    /// Propagation failure at a given instant.
    #[error("propagation error: {0}")]
    Propagation(String),

    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),
}
