//! Contiguous arena segments.
//!
//! A [`Segment`] is one tagged heap buffer with its own bump cursor. The
//! arena chains segments newest-first; an older segment keeps the cursor
//! it had when the arena moved past it, which is where allocation resumes
//! if the newer segments are discarded.

use strata_alloc::{TagAllocator, TaggedBuf};
use strata_core::{AllocError, AllocTag, RegionId};

/// A single contiguous memory segment with bump allocation.
pub struct Segment {
    /// Backing storage, allocated to full capacity at creation.
    buf: TaggedBuf<u8>,
    /// Bump pointer: next free byte.
    cursor: usize,
}

impl Segment {
    /// Allocate a segment of `bytes` capacity charged to `tag`.
    pub fn new(allocator: &TagAllocator, bytes: usize, tag: AllocTag) -> Result<Self, AllocError> {
        Ok(Self {
            buf: allocator.alloc(bytes, tag)?,
            cursor: 0,
        })
    }

    /// Identity of this segment's memory.
    pub fn id(&self) -> RegionId {
        self.buf.region()
    }

    /// Bump-allocate `len` bytes, returning the starting offset, or `None`
    /// if the segment lacks room. The returned range is zero-filled.
    pub fn alloc(&mut self, len: usize) -> Option<usize> {
        let new_cursor = self.cursor.checked_add(len)?;
        if new_cursor > self.buf.len() {
            return None;
        }
        let offset = self.cursor;
        self.buf[offset..new_cursor].fill(0);
        self.cursor = new_cursor;
        Some(offset)
    }

    /// Move the cursor back to `offset`, invalidating everything after it.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is ahead of the cursor.
    pub fn rewind_to(&mut self, offset: usize) {
        assert!(
            offset <= self.cursor,
            "rewind to {offset} is ahead of cursor {}",
            self.cursor
        );
        self.cursor = offset;
    }

    /// Reset the cursor to the start of the segment.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The allocated bytes `[offset, offset + len)`, if all of them lie
    /// below the cursor.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.cursor {
            return None;
        }
        Some(&self.buf[offset..end])
    }

    /// Mutable form of [`slice`](Self::slice).
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        if end > self.cursor {
            return None;
        }
        Some(&mut self.buf[offset..end])
    }

    /// Bytes allocated so far.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: AllocTag = AllocTag::new(*b"sgmt");

    #[test]
    fn sequential_alloc() {
        let alloc = TagAllocator::new();
        let mut seg = Segment::new(&alloc, 1024, TAG).unwrap();
        assert_eq!(seg.alloc(100), Some(0));
        assert_eq!(seg.alloc(200), Some(100));
        assert_eq!(seg.used(), 300);
        assert_eq!(seg.remaining(), 724);
    }

    #[test]
    fn alloc_fails_when_full() {
        let alloc = TagAllocator::new();
        let mut seg = Segment::new(&alloc, 100, TAG).unwrap();
        assert!(seg.alloc(100).is_some());
        assert!(seg.alloc(1).is_none());
        assert!(seg.alloc(0).is_some());
    }

    #[test]
    fn realloc_after_rewind_is_zeroed() {
        let alloc = TagAllocator::new();
        let mut seg = Segment::new(&alloc, 16, TAG).unwrap();
        let off = seg.alloc(8).unwrap();
        seg.slice_mut(off, 8).unwrap().fill(0xff);
        seg.rewind_to(0);
        let off = seg.alloc(8).unwrap();
        assert!(seg.slice(off, 8).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn slice_past_cursor_is_none() {
        let alloc = TagAllocator::new();
        let mut seg = Segment::new(&alloc, 16, TAG).unwrap();
        seg.alloc(4).unwrap();
        assert!(seg.slice(0, 4).is_some());
        assert!(seg.slice(2, 4).is_none());
    }

    #[test]
    #[should_panic(expected = "ahead of cursor")]
    fn rewind_forward_panics() {
        let alloc = TagAllocator::new();
        let mut seg = Segment::new(&alloc, 16, TAG).unwrap();
        seg.rewind_to(4);
    }

    #[test]
    fn segment_memory_is_charged_to_tag() {
        let alloc = TagAllocator::new();
        let seg = Segment::new(&alloc, 64, TAG).unwrap();
        assert_eq!(alloc.stat(TAG).nbytes, 64);
        drop(seg);
        assert_eq!(alloc.stat(TAG).nbytes, 0);
    }
}
