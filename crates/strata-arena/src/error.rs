//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use strata_core::{AllocError, Status};

/// Errors that can occur during arena operations.
///
/// Every variant is resource exhaustion local to the failing call; the
/// arena is left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request is larger than a whole segment. Segments never grow to
    /// fit one oversized request, so this fails even with growth enabled.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Capacity of a single segment in bytes.
        capacity: usize,
    },
    /// The current segment is full and the arena is not allowed to grow.
    GrowthDisabled {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left in the current segment.
        remaining: usize,
    },
    /// The heap could not provide a new segment or frame record.
    OutOfMemory(AllocError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, segment capacity {capacity} bytes"
                )
            }
            Self::GrowthDisabled {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena exhausted: requested {requested} bytes, {remaining} remaining and growth disabled"
                )
            }
            Self::OutOfMemory(e) => write!(f, "arena segment allocation failed: {e}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfMemory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocError> for ArenaError {
    fn from(e: AllocError) -> Self {
        Self::OutOfMemory(e)
    }
}

impl From<&ArenaError> for Status {
    fn from(_e: &ArenaError) -> Self {
        Status::NO_MEM
    }
}
