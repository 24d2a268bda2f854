//! Errors surfaced by the control surface.

use thiserror::Error;
use vigil_checks::CheckError;

use crate::endpoint::Endpoint;

const ENOENT: i32 = 2;
const EACCES: i32 = 13;

/// Failures reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// A core operation failed.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// The endpoint name is not recognised.
    #[error("unknown endpoint: {endpoint}")]
    UnknownEndpoint {
        /// Name as supplied by the operator.
        endpoint: String,
    },

    /// A write-only endpoint was read.
    #[error("endpoint '{endpoint}' is write-only")]
    NotReadable {
        /// Endpoint that was read.
        endpoint: Endpoint,
    },

    /// A read-only endpoint was written.
    #[error("endpoint '{endpoint}' is read-only")]
    NotWritable {
        /// Endpoint that was written.
        endpoint: Endpoint,
    },
}

impl ControlError {
    /// POSIX error number reported to the operator.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::Check(error) => error.errno(),
            Self::UnknownEndpoint { .. } => ENOENT,
            Self::NotReadable { .. } | Self::NotWritable { .. } => EACCES,
        }
    }
}
