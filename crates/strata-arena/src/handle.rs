//! Arena allocation handles and bump-pointer positions.

use std::fmt;

use strata_core::{Addr, RegionId};

/// Location of one arena allocation.
///
/// Resolved through [`FrameArena::get`](crate::FrameArena::get). A handle
/// stops resolving once its segment is released, or once a `leave()`
/// rewinds the segment's cursor below the end of the allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ArenaSpan {
    /// Segment the bytes live in.
    pub(crate) segment: RegionId,
    /// Byte offset within the segment.
    pub(crate) offset: usize,
    /// Length in bytes.
    pub(crate) len: usize,
}

impl ArenaSpan {
    /// Segment the bytes live in.
    pub fn segment(&self) -> RegionId {
        self.segment
    }

    /// Byte offset within the segment.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte.
    pub fn addr(&self) -> Addr {
        Addr::new(self.segment, self.offset)
    }

    /// Address one past the last byte.
    pub fn end(&self) -> Addr {
        Addr::new(self.segment, self.offset + self.len)
    }
}

impl fmt::Display for ArenaSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaSpan({}+{}, len={})", self.segment, self.offset, self.len)
    }
}

/// Where the next arena allocation will be made.
///
/// Also the record pushed by [`FrameArena::enter`](crate::FrameArena::enter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BumpPointer {
    /// Current segment.
    pub segment: RegionId,
    /// Cursor within that segment.
    pub offset: usize,
}

impl BumpPointer {
    /// The pointer as an address.
    pub fn addr(&self) -> Addr {
        Addr::new(self.segment, self.offset)
    }
}

impl From<ArenaSpan> for BumpPointer {
    /// The bump pointer immediately after `span`.
    fn from(span: ArenaSpan) -> Self {
        Self {
            segment: span.segment,
            offset: span.offset + span.len,
        }
    }
}

impl fmt::Display for BumpPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.segment, self.offset)
    }
}
