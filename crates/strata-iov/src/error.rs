//! Scatter-gather error types.

use std::error::Error;
use std::fmt;

use strata_arena::ArenaError;
use strata_core::{AllocError, Status};

/// Errors from allocating scatter-gather storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IovError {
    /// The tagged allocator could not provide the span slots.
    Alloc(AllocError),
    /// The arena could not reserve the vector's footprint.
    Arena(ArenaError),
}

impl fmt::Display for IovError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(e) => write!(f, "scatter-gather allocation failed: {e}"),
            Self::Arena(e) => write!(f, "scatter-gather arena reservation failed: {e}"),
        }
    }
}

impl Error for IovError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(e) => Some(e),
            Self::Arena(e) => Some(e),
        }
    }
}

impl From<AllocError> for IovError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}

impl From<ArenaError> for IovError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<&IovError> for Status {
    fn from(e: &IovError) -> Self {
        match e {
            IovError::Alloc(e) => Status::from(e),
            IovError::Arena(e) => Status::from(e),
        }
    }
}
