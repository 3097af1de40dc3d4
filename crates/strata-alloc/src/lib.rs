//! Tagged heap allocation with live per-tag statistics.
//!
//! Every allocation names an [`AllocTag`] identifying the subsystem that
//! owns it. The allocator keeps running counters (allocation count and
//! byte count) per tag, so memory use can be attributed at any moment.
//!
//! ```text
//! TagAllocator (Arc handle)
//! └── StatTable
//!     └── Mutex<StatBucket> × 16      (bucket = tag & 15)
//!         └── LinkPool<AllocStat>     (move-to-front on lookup)
//!
//! TaggedBuf<T>  ── header {tag, bytes} + Box<[T]> + table handle
//! ```
//!
//! The free functions in this crate ([`alloc`], [`stat`], [`stats`]) use
//! the process-wide [`TagAllocator::global`] instance.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod stats;
pub mod tagged;

pub use stats::{AllocStat, STAT_BUCKETS};
pub use strata_core::{AllocError, AllocTag};
pub use tagged::{AllocHeader, TagAllocator, TaggedBuf};

/// Allocate `bytes` zeroed bytes from the global allocator.
pub fn alloc(bytes: usize, tag: AllocTag) -> Result<TaggedBuf<u8>, AllocError> {
    TagAllocator::global().alloc(bytes, tag)
}

/// Release a buffer allocated from the global allocator.
pub fn free<T>(buf: TaggedBuf<T>) {
    TagAllocator::global().free(buf)
}

/// Current counters for `tag` in the global allocator.
pub fn stat(tag: AllocTag) -> AllocStat {
    TagAllocator::global().stat(tag)
}

/// Counters for as many tags as fit in `buffer`; returns the tag count.
pub fn stats(buffer: &mut [AllocStat]) -> usize {
    TagAllocator::global().stats(buffer)
}
