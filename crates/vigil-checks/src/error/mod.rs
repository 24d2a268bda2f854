//! Domain errors raised by registry, selection, and owner operations.
//!
//! Every variant carries enough context to render an actionable message, and
//! [`CheckError::errno`] maps each one onto the POSIX code that control-file
//! writers historically received.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors arising from check registration, selection, and plugin lifetime
/// management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// No check with the requested name or alias is present.
    #[error("no check named or aliased '{token}'")]
    NotFound {
        /// Token that was looked up.
        token: String,
    },

    /// The check is already part of the selection.
    #[error("check '{name}' is already selected")]
    AlreadyExists {
        /// Name of the check that was selected twice.
        name: String,
    },

    /// Growing one of the internal collections failed.
    #[error("out of memory")]
    OutOfMemory,

    /// The owning plugin refused a pin because it is being unloaded.
    #[error("plugin '{owner}' is unloading")]
    InvalidOwner {
        /// Name of the owning plugin.
        owner: String,
    },

    /// A caller-supplied value was malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// The plugin cannot start unloading while its checks are pinned.
    #[error("plugin '{owner}' is in use ({pins} outstanding pin(s))")]
    InUse {
        /// Name of the owning plugin.
        owner: String,
        /// Number of pins still held.
        pins: usize,
    },
}

impl CheckError {
    /// Builds an [`CheckError::InvalidArgument`] from a message.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the POSIX error number associated with this error.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 2,
            Self::OutOfMemory => 12,
            Self::InUse { .. } => 16,
            Self::AlreadyExists { .. } => 17,
            Self::InvalidOwner { .. } | Self::InvalidArgument { .. } => 22,
        }
    }
}

impl From<TryReserveError> for CheckError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
