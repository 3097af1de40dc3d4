//! Allocation error type shared by every crate that draws on the heap.

use std::error::Error;
use std::fmt;

use crate::id::AllocTag;

/// Errors from the tagged heap allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The system heap could not satisfy the request.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Tag the allocation would have been charged to.
        tag: AllocTag,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested, tag } => {
                write!(f, "out of memory: requested {requested} bytes for tag '{tag}'")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_tag_and_size() {
        let e = AllocError::OutOfMemory {
            requested: 128,
            tag: AllocTag::new(*b"iobf"),
        };
        assert_eq!(
            e.to_string(),
            "out of memory: requested 128 bytes for tag 'iobf'"
        );
    }
}
