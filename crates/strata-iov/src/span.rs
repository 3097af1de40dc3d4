//! Span descriptors and byte positions.

use std::fmt;

use strata_arena::ArenaSpan;
use strata_core::{Addr, RegionId};

/// One contiguous region of a scatter-gather vector's byte stream.
///
/// A span only describes memory; it does not own it. The bytes live in a
/// [`TaggedBuf`](strata_alloc::TaggedBuf) or a
/// [`FrameArena`](strata_arena::FrameArena) segment identified by
/// `addr.region`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte.
    pub addr: Addr,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    /// The zeroed slot value: no region, no bytes.
    pub const EMPTY: Span = Span {
        addr: Addr::new(RegionId::NONE, 0),
        len: 0,
    };

    /// Build a span.
    pub const fn new(addr: Addr, len: usize) -> Self {
        Self { addr, len }
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address one past the last byte.
    pub fn end(&self) -> Addr {
        self.addr.add(self.len)
    }
}

impl From<ArenaSpan> for Span {
    fn from(span: ArenaSpan) -> Self {
        Self::new(span.addr(), span.len())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {}]", self.addr, self.len)
    }
}

/// A byte position inside a scatter-gather vector.
///
/// `index` names the span, `offset` the byte within it and `cumulative`
/// the byte's distance from the start of the whole stream. The end
/// position has `index == count` and `offset == 0`. A position on a span
/// boundary always names the start of the following span, never the
/// trailing edge of the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Span index.
    pub index: usize,
    /// Offset within that span.
    pub offset: usize,
    /// Offset from the start of the vector.
    pub cumulative: usize,
}

impl Position {
    /// The first byte of the first span.
    pub const START: Position = Position {
        index: 0,
        offset: 0,
        cumulative: 0,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (@{})", self.index, self.offset, self.cumulative)
    }
}
