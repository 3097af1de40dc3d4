//! The scatter-gather vector: storage, building and positions.

use std::mem;

use smallvec::SmallVec;
use strata_alloc::{TagAllocator, TaggedBuf};
use strata_arena::{ArenaSpan, FrameArena};
use strata_core::{Addr, AllocTag};

use crate::error::IovError;
use crate::span::{Position, Span};

/// Span slots [`ScatterGather::new`] keeps inline before spilling to the heap.
pub const INLINE_SPANS: usize = 4;

/// Bytes of fixed header per vector: count and capacity.
pub const HEADER_BYTES: usize = 2 * mem::size_of::<usize>();

/// Bytes per span slot.
pub const SPAN_BYTES: usize = mem::size_of::<Span>();

#[derive(Debug)]
enum Slots {
    Local(SmallVec<[Span; INLINE_SPANS]>),
    Tagged(TaggedBuf<Span>),
}

impl Slots {
    fn as_slice(&self) -> &[Span] {
        match self {
            Self::Local(v) => v.as_slice(),
            Self::Tagged(b) => b.as_slice(),
        }
    }

    fn as_mut_slice(&mut self) -> &mut [Span] {
        match self {
            Self::Local(v) => v.as_mut_slice(),
            Self::Tagged(b) => b.as_mut_slice(),
        }
    }
}

/// An ordered list of spans describing one logical byte stream.
///
/// Capacity is fixed at construction; every slot starts as
/// [`Span::EMPTY`]. The vector never owns the bytes its spans describe.
///
/// When created by [`stackalloc`](Self::stackalloc), the vector's
/// footprint is reserved in the arena's current frame, so the frame's
/// usage accounts for it and `leave()` reclaims it. Its slots never come
/// from the untagged heap.
#[derive(Debug)]
pub struct ScatterGather {
    slots: Slots,
    count: usize,
    footprint: Option<ArenaSpan>,
}

impl ScatterGather {
    /// Storage size of a vector with room for `spans` spans.
    ///
    /// Saturates instead of overflowing, so an absurd span count turns
    /// into a request no allocator can satisfy.
    pub fn measure(spans: usize) -> usize {
        spans.saturating_mul(SPAN_BYTES).saturating_add(HEADER_BYTES)
    }

    /// An empty vector with `capacity` zeroed slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Slots::Local(SmallVec::from_elem(Span::EMPTY, capacity)),
            count: 0,
            footprint: None,
        }
    }

    /// A full vector of exactly one span.
    pub fn single(addr: Addr, len: usize) -> Self {
        let mut v = Self::new(1);
        v.slots.as_mut_slice()[0] = Span::new(addr, len);
        v.count = 1;
        v
    }

    /// An empty vector whose slots are charged to `tag` in `allocator`.
    pub fn alloc(
        capacity: usize,
        allocator: &TagAllocator,
        tag: AllocTag,
    ) -> Result<Self, IovError> {
        let buf = allocator.alloc_array::<Span>(capacity, tag)?;
        Ok(Self {
            slots: Slots::Tagged(buf),
            count: 0,
            footprint: None,
        })
    }

    /// An empty vector whose footprint is reserved in `arena`'s current
    /// frame. The span slots are charged to the arena's tag in the
    /// arena's allocator, so every byte the vector touches is accounted
    /// against that tag.
    pub fn stackalloc(capacity: usize, arena: &mut FrameArena) -> Result<Self, IovError> {
        let slots = arena.allocator().alloc_array::<Span>(capacity, arena.tag())?;
        let footprint = arena.alloc(Self::measure(capacity))?;
        Ok(Self {
            slots: Slots::Tagged(slots),
            count: 0,
            footprint: Some(footprint),
        })
    }

    /// Append a span.
    ///
    /// # Errors
    ///
    /// Returns the span back if the vector is full.
    pub fn push(&mut self, span: Span) -> Result<(), Span> {
        if self.count == self.capacity() {
            return Err(span);
        }
        self.slots.as_mut_slice()[self.count] = span;
        self.count += 1;
        Ok(())
    }

    /// Remove every span and zero the slots. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.as_mut_slice()[..self.count].fill(Span::EMPTY);
        self.count = 0;
    }

    /// The spans in stream order.
    pub fn spans(&self) -> &[Span] {
        &self.slots.as_slice()[..self.count]
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Span] {
        self.slots.as_mut_slice()
    }

    pub(crate) fn set_len(&mut self, count: usize) {
        debug_assert!(count <= self.capacity());
        self.count = count;
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the vector holds no spans.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of spans.
    pub fn capacity(&self) -> usize {
        self.slots.as_slice().len()
    }

    /// Sum of all span lengths.
    pub fn total_len(&self) -> usize {
        self.spans().iter().map(|s| s.len).sum()
    }

    /// The arena reservation backing this vector, if it was stack-allocated.
    pub fn footprint(&self) -> Option<ArenaSpan> {
        self.footprint
    }

    /// Position of the first byte.
    pub fn start(&self) -> Position {
        Position::START
    }

    /// Position one past the last byte.
    pub fn end(&self) -> Position {
        Position {
            index: self.count,
            offset: 0,
            cumulative: self.total_len(),
        }
    }

    /// Position of the byte `offset` bytes into the stream, or
    /// [`end`](Self::end) if `offset` is at or past the total length.
    pub fn at(&self, offset: usize) -> Position {
        self.advance(Position::START, offset)
    }

    /// The position `delta` bytes after `pos`, clamped to
    /// [`end`](Self::end).
    pub fn advance(&self, pos: Position, delta: usize) -> Position {
        let spans = self.spans();
        if pos.index >= spans.len() {
            return self.end();
        }
        let mut remaining = pos.offset.saturating_add(delta);
        for (index, span) in spans.iter().enumerate().skip(pos.index) {
            if remaining < span.len {
                return Position {
                    index,
                    offset: remaining,
                    cumulative: pos.cumulative + delta,
                };
            }
            remaining -= span.len;
        }
        self.end()
    }

    /// The position `delta` bytes before `pos`, clamped to
    /// [`start`](Self::start).
    ///
    /// Walks backward from `pos`, and lands on the same position
    /// [`at`](Self::at) would give for the target offset: a target on a
    /// span boundary names the start of the following span.
    pub fn rewind(&self, pos: Position, delta: usize) -> Position {
        if delta == 0 {
            return pos;
        }
        if delta >= pos.cumulative {
            return Position::START;
        }
        let spans = self.spans();
        let target = pos.cumulative - delta;
        let mut index = pos.index.min(spans.len());
        // Stream offset of the first byte of span `index`.
        let mut base = pos.cumulative.saturating_sub(pos.offset);
        while base > target && index > 0 {
            index -= 1;
            base = base.saturating_sub(spans[index].len);
        }
        let landed = Position {
            index,
            offset: target - base,
            cumulative: target,
        };
        // Normalizes a landing on a trailing edge or an empty span.
        self.advance(landed, 0)
    }
}
