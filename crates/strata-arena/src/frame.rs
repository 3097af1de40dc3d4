//! The segmented frame arena.

use std::fmt;

use strata_alloc::TagAllocator;
use strata_core::{Addr, AllocError, AllocTag};
use strata_list::{SLinkPool, SListHead};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{ArenaSpan, BumpPointer};
use crate::segment::Segment;

/// A bump allocator over a chain of fixed-size segments, with nested
/// frames that release everything allocated since their `enter()`.
///
/// The arena always owns at least one segment. The segment currently
/// being allocated from is held directly; older segments sit on a
/// newest-first stack behind it and keep the cursor they had when the
/// arena moved on.
///
/// Not internally synchronized: an arena may be moved to another thread
/// but must not be shared between threads while in use.
pub struct FrameArena {
    allocator: TagAllocator,
    config: ArenaConfig,
    current: Segment,
    older: SListHead,
    pool: SLinkPool<Segment>,
    frames: Vec<BumpPointer>,
}

impl FrameArena {
    /// Create an arena with one segment of `config.segment_bytes`, charging
    /// all segment memory to `config.tag` in `allocator`.
    pub fn new(config: ArenaConfig, allocator: &TagAllocator) -> Result<Self, ArenaError> {
        let current = Segment::new(allocator, config.segment_bytes, config.tag)?;
        tracing::debug!(
            segment = %current.id(),
            bytes = config.segment_bytes,
            tag = %config.tag,
            "frame arena created"
        );
        Ok(Self {
            allocator: allocator.clone(),
            config,
            current,
            older: SListHead::new(),
            pool: SLinkPool::new(),
            frames: Vec::new(),
        })
    }

    /// Create a growable arena of `segment_bytes` segments on the global
    /// allocator.
    pub fn initialize(segment_bytes: usize, tag: AllocTag) -> Result<Self, ArenaError> {
        Self::new(
            ArenaConfig::new(segment_bytes, tag),
            TagAllocator::global(),
        )
    }

    /// Bump-allocate `bytes` zeroed bytes.
    ///
    /// When the current segment is full and growth is enabled, a fresh
    /// segment of the same capacity becomes current. A request larger
    /// than one segment always fails with
    /// [`ArenaError::CapacityExceeded`].
    pub fn alloc(&mut self, bytes: usize) -> Result<ArenaSpan, ArenaError> {
        let capacity = self.current.capacity();
        if bytes > capacity {
            return Err(ArenaError::CapacityExceeded {
                requested: bytes,
                capacity,
            });
        }
        if let Some(offset) = self.current.alloc(bytes) {
            return Ok(self.span(offset, bytes));
        }
        if !self.config.grows {
            return Err(ArenaError::GrowthDisabled {
                requested: bytes,
                remaining: self.current.remaining(),
            });
        }
        self.grow(capacity)?;
        match self.current.alloc(bytes) {
            Some(offset) => Ok(self.span(offset, bytes)),
            None => unreachable!("fresh segment of {capacity} bytes cannot hold {bytes}"),
        }
    }

    fn span(&self, offset: usize, len: usize) -> ArenaSpan {
        ArenaSpan {
            segment: self.current.id(),
            offset,
            len,
        }
    }

    fn grow(&mut self, capacity: usize) -> Result<(), ArenaError> {
        let fresh = Segment::new(&self.allocator, capacity, self.config.tag)?;
        tracing::debug!(
            segment = %fresh.id(),
            bytes = capacity,
            count = self.segment_count() + 1,
            "arena grew by one segment"
        );
        let full = std::mem::replace(&mut self.current, fresh);
        let node = self.pool.insert(full);
        self.pool.push(&mut self.older, node);
        Ok(())
    }

    /// Make the newest older segment current again, releasing the one
    /// that was current. Returns `false` if there is no older segment.
    fn discard_current(&mut self) -> bool {
        let Some(node) = self.pool.pop(&mut self.older) else {
            return false;
        };
        let Some(previous) = self.pool.release(node) else {
            unreachable!("segment chain holds released node {node}")
        };
        let discarded = std::mem::replace(&mut self.current, previous);
        tracing::trace!(segment = %discarded.id(), "arena segment released");
        true
    }

    /// Start a frame at the current bump pointer.
    ///
    /// Fails only if the frame record itself cannot be stored.
    pub fn enter(&mut self) -> Result<(), ArenaError> {
        if self.frames.try_reserve(1).is_err() {
            return Err(ArenaError::OutOfMemory(AllocError::OutOfMemory {
                requested: std::mem::size_of::<BumpPointer>(),
                tag: self.config.tag,
            }));
        }
        self.frames.push(self.position());
        Ok(())
    }

    /// End the innermost frame: the bump pointer returns to where it was at
    /// the matching `enter()`, and segments created since are released.
    ///
    /// # Panics
    ///
    /// Panics if no frame is active.
    pub fn leave(&mut self) {
        let Some(mark) = self.frames.pop() else {
            panic!("leave() called with no active frame");
        };
        while self.current.id() != mark.segment {
            if !self.discard_current() {
                panic!("frame mark {mark} not found in segment chain");
            }
        }
        // Only the oldest segment can be marked at offset 0: a segment is
        // grown for an allocation that does not fit, and that allocation
        // always lands in it.
        debug_assert!(
            mark.offset > 0 || self.older.is_empty(),
            "frame mark {mark} at the start of a grown segment"
        );
        self.current.rewind_to(mark.offset);
    }

    /// Release every segment except the oldest, reset it to empty, and drop
    /// all active frames.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        while self.discard_current() {
            released += 1;
        }
        self.current.reset();
        self.frames.clear();
        tracing::trace!(released, "arena cleared");
    }

    /// Release every segment. Consuming the arena makes later use a
    /// compile error.
    pub fn cleanup(self) {
        tracing::debug!(
            segments = self.segment_count(),
            tag = %self.config.tag,
            "frame arena released"
        );
    }

    fn segment(&self, span: &ArenaSpan) -> Option<&Segment> {
        if self.current.id() == span.segment {
            return Some(&self.current);
        }
        self.pool
            .iter(&self.older)
            .map(|(_, seg)| seg)
            .find(|seg| seg.id() == span.segment)
    }

    fn segment_mut(&mut self, span: &ArenaSpan) -> Option<&mut Segment> {
        if self.current.id() == span.segment {
            return Some(&mut self.current);
        }
        let node = self
            .pool
            .iter(&self.older)
            .find(|(_, seg)| seg.id() == span.segment)
            .map(|(node, _)| node)?;
        self.pool.get_mut(node)
    }

    /// The bytes of a live allocation, or `None` if its segment has been
    /// released or rewound past it.
    pub fn get(&self, span: &ArenaSpan) -> Option<&[u8]> {
        self.segment(span)?.slice(span.offset, span.len)
    }

    /// Mutable form of [`get`](Self::get).
    pub fn get_mut(&mut self, span: &ArenaSpan) -> Option<&mut [u8]> {
        let (offset, len) = (span.offset, span.len);
        self.segment_mut(span)?.slice_mut(offset, len)
    }

    /// Resolve `len` bytes at `addr`, which may sit anywhere inside a live
    /// allocation.
    pub fn resolve(&self, addr: Addr, len: usize) -> Option<&[u8]> {
        self.get(&ArenaSpan {
            segment: addr.region,
            offset: addr.offset,
            len,
        })
    }

    /// Mutable form of [`resolve`](Self::resolve).
    pub fn resolve_mut(&mut self, addr: Addr, len: usize) -> Option<&mut [u8]> {
        self.get_mut(&ArenaSpan {
            segment: addr.region,
            offset: addr.offset,
            len,
        })
    }

    /// Where the next allocation will be made.
    pub fn position(&self) -> BumpPointer {
        BumpPointer {
            segment: self.current.id(),
            offset: self.current.used(),
        }
    }

    /// Number of segments held, current one included.
    pub fn segment_count(&self) -> usize {
        1 + self.pool.iter(&self.older).count()
    }

    /// Capacity of each segment in bytes.
    pub fn segment_capacity(&self) -> usize {
        self.current.capacity()
    }

    /// Number of active frames.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Bytes allocated in the current segment.
    pub fn used(&self) -> usize {
        self.current.used()
    }

    /// Bytes left in the current segment.
    pub fn remaining(&self) -> usize {
        self.current.remaining()
    }

    /// Tag charged for segment memory.
    pub fn tag(&self) -> AllocTag {
        self.config.tag
    }

    /// Whether the arena may add segments.
    pub fn grows(&self) -> bool {
        self.config.grows
    }

    /// Enable or disable growth. Existing segments are kept either way.
    pub fn set_grows(&mut self, grows: bool) {
        self.config.grows = grows;
    }

    /// The allocator segments are charged to.
    pub fn allocator(&self) -> &TagAllocator {
        &self.allocator
    }
}

impl fmt::Debug for FrameArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameArena")
            .field("tag", &self.config.tag)
            .field("segment_bytes", &self.current.capacity())
            .field("segments", &self.segment_count())
            .field("position", &self.position())
            .field("frames", &self.frames.len())
            .field("grows", &self.config.grows)
            .finish()
    }
}
