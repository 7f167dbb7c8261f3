use thiserror::Error;

use crate::{CpuId, MAX_CPU_ID};

/// Errors that can occur when parsing CPU set notation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided a supposed range notation string but it did not match the expected
    /// format.
    #[error("invalid range syntax: '{invalid_value}' is invalid: {problem}")]
    InvalidRangeSyntax {
        /// The specific value that was invalid. This may either be the entire range string
        /// or a single entry of it, depending on the problem.
        invalid_value: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// The caller provided a supposed hexadecimal mask string but it did not match the expected
    /// format.
    #[error("invalid mask syntax: '{invalid_value}' is invalid: {problem}")]
    InvalidMaskSyntax {
        /// The specific value that was invalid. This may either be the entire mask string
        /// or a single comma-separated group of it, depending on the problem.
        invalid_value: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// A CPU identifier was negative or larger than [`MAX_CPU_ID`].
    #[error("CPU identifier '{invalid_value}' is out of range: must be between 0 and {max}")]
    CpuOutOfRange {
        /// The text that referenced the out-of-range identifier.
        invalid_value: String,

        /// The largest identifier that would have been accepted.
        max: CpuId,
    },
}

impl Error {
    pub(crate) fn range_syntax(invalid_value: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidRangeSyntax {
            invalid_value: invalid_value.into(),
            problem: problem.into(),
        }
    }

    pub(crate) fn mask_syntax(invalid_value: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidMaskSyntax {
            invalid_value: invalid_value.into(),
            problem: problem.into(),
        }
    }

    pub(crate) fn out_of_range(invalid_value: impl Into<String>) -> Self {
        Self::CpuOutOfRange {
            invalid_value: invalid_value.into(),
            max: MAX_CPU_ID,
        }
    }
}

/// A specialized `Result` type for CPU set operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
