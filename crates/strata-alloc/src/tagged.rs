//! Tagged heap buffers and the allocator that charges them to tags.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

use strata_core::{Addr, AllocError, AllocTag, RegionId};

use crate::stats::{AllocStat, StatTable};

/// Metadata recorded for every tagged allocation.
///
/// Kept in the owning [`TaggedBuf`] rather than in front of the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocHeader {
    /// Tag the allocation is charged to.
    pub tag: AllocTag,
    /// Payload size in bytes.
    pub bytes: usize,
}

/// Heap allocator that attributes every allocation to an [`AllocTag`].
///
/// A `TagAllocator` is a handle to one statistics table; cloning it is
/// cheap and every clone charges the same table. Buffers keep the table
/// alive, so a table lives until its last handle and its last buffer are
/// gone.
///
/// Most code uses the process-wide instance from
/// [`TagAllocator::global`]. Independent instances from
/// [`TagAllocator::new`] are useful for isolated accounting, e.g. in tests.
#[derive(Clone)]
pub struct TagAllocator {
    table: Arc<StatTable>,
}

impl TagAllocator {
    /// Create an allocator with its own, empty statistics table.
    pub fn new() -> Self {
        Self {
            table: Arc::new(StatTable::new()),
        }
    }

    /// The process-wide allocator.
    ///
    /// Initialised exactly once on first use; concurrent first callers all
    /// observe the same instance.
    pub fn global() -> &'static TagAllocator {
        static GLOBAL: OnceLock<TagAllocator> = OnceLock::new();
        GLOBAL.get_or_init(TagAllocator::new)
    }

    /// Allocate `bytes` zeroed bytes charged to `tag`.
    pub fn alloc(&self, bytes: usize, tag: AllocTag) -> Result<TaggedBuf<u8>, AllocError> {
        self.alloc_array(bytes, tag)
    }

    /// Allocate `len` default-initialised elements charged to `tag`.
    ///
    /// The tag is charged `len * size_of::<T>()` bytes.
    pub fn alloc_array<T: Copy + Default>(
        &self,
        len: usize,
        tag: AllocTag,
    ) -> Result<TaggedBuf<T>, AllocError> {
        let bytes = len
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(AllocError::OutOfMemory {
                requested: usize::MAX,
                tag,
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| AllocError::OutOfMemory {
                requested: bytes,
                tag,
            })?;
        data.resize(len, T::default());

        self.table.record_alloc(tag, bytes);
        Ok(TaggedBuf {
            header: AllocHeader { tag, bytes },
            region: RegionId::next(),
            data: data.into_boxed_slice(),
            table: Arc::clone(&self.table),
        })
    }

    /// Release a buffer. Equivalent to dropping it.
    ///
    /// # Panics
    ///
    /// Panics if the buffer was allocated by a different allocator.
    pub fn free<T>(&self, buf: TaggedBuf<T>) {
        assert!(
            Arc::ptr_eq(&self.table, &buf.table),
            "buffer tagged '{}' freed through a foreign allocator",
            buf.header.tag
        );
        drop(buf);
    }

    /// Current counters for one tag.
    pub fn stat(&self, tag: AllocTag) -> AllocStat {
        self.table.stat(tag)
    }

    /// Copy counters for as many tags as fit in `buffer`.
    ///
    /// Returns the total number of tags known to the table. If that is
    /// larger than `buffer.len()`, the buffer holds an arbitrary subset and
    /// the caller may retry with a bigger one. Entries past the number of
    /// tags are left untouched.
    pub fn stats(&self, buffer: &mut [AllocStat]) -> usize {
        self.table.stats(buffer)
    }

    /// Counters for every tag, in table order.
    pub fn snapshot(&self) -> Vec<AllocStat> {
        let mut buffer = vec![AllocStat::default(); STAT_SNAPSHOT_HINT];
        loop {
            let total = self.table.stats(&mut buffer);
            if total <= buffer.len() {
                buffer.truncate(total);
                return buffer;
            }
            buffer.resize(total, AllocStat::default());
        }
    }
}

const STAT_SNAPSHOT_HINT: usize = 32;

impl Default for TagAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagAllocator")
            .field("table", &Arc::as_ptr(&self.table))
            .finish()
    }
}

/// An owned, tagged heap buffer.
///
/// Dropping the buffer releases it and decrements its tag's counters.
pub struct TaggedBuf<T> {
    header: AllocHeader,
    region: RegionId,
    data: Box<[T]>,
    table: Arc<StatTable>,
}

impl<T> TaggedBuf<T> {
    /// Tag this buffer is charged to.
    pub fn tag(&self) -> AllocTag {
        self.header.tag
    }

    /// The allocation header.
    pub fn header(&self) -> AllocHeader {
        self.header
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload size in bytes, as charged to the tag.
    pub fn byte_len(&self) -> usize {
        self.header.bytes
    }

    /// Unique identity of this buffer's memory.
    pub fn region(&self) -> RegionId {
        self.region
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl TaggedBuf<u8> {
    /// Address of the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the buffer.
    pub fn addr(&self, offset: usize) -> Addr {
        assert!(offset <= self.data.len(), "offset {offset} out of bounds");
        Addr::new(self.region, offset)
    }

    /// The bytes `[addr, addr + len)` if they lie inside this buffer.
    pub fn resolve(&self, addr: Addr, len: usize) -> Option<&[u8]> {
        if addr.region != self.region {
            return None;
        }
        let end = addr.offset.checked_add(len)?;
        self.data.get(addr.offset..end)
    }

    /// Mutable form of [`resolve`](Self::resolve).
    pub fn resolve_mut(&mut self, addr: Addr, len: usize) -> Option<&mut [u8]> {
        if addr.region != self.region {
            return None;
        }
        let end = addr.offset.checked_add(len)?;
        self.data.get_mut(addr.offset..end)
    }
}

impl<T> Deref for TaggedBuf<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for TaggedBuf<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Drop for TaggedBuf<T> {
    fn drop(&mut self) {
        self.table.record_free(self.header.tag, self.header.bytes);
    }
}

impl<T> fmt::Debug for TaggedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedBuf")
            .field("tag", &self.header.tag.to_string())
            .field("bytes", &self.header.bytes)
            .field("region", &self.region)
            .finish()
    }
}
