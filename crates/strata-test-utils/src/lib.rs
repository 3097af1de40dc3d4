//! Test utilities and fixtures for strata development.
//!
//! Provides collision-free allocation tags for tests that share the global
//! allocator, and builders for scatter-gather vectors over real buffers.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{arena_with_chunks, fill_pattern, spans_over};

use std::sync::atomic::{AtomicU32, Ordering};

use strata_core::AllocTag;

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

/// A tag no other caller in this process has been given.
///
/// The first byte is `~`, which no ordinary four-character tag uses, so
/// tests running in parallel against [`strata_alloc::stat`] never see each
/// other's counters.
pub fn unique_tag() -> AllocTag {
    let n = NEXT_TAG.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
    AllocTag(u32::from(b'~') << 24 | n)
}
