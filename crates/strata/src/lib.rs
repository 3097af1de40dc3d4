//! Strata: the memory runtime underneath an asynchronous I/O framework.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! strata sub-crates. For most users, adding `strata` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Request-scoped scratch memory, charged to the tag "req ".
//! let allocator = TagAllocator::new();
//! let tag = AllocTag::new(*b"req ");
//! let mut arena = FrameArena::new(ArenaConfig::new(4096, tag), &allocator).unwrap();
//!
//! arena.enter().unwrap();
//! let head = arena.alloc(5).unwrap();
//! let body = arena.alloc(6).unwrap();
//! arena.get_mut(&head).unwrap().copy_from_slice(b"hello");
//! arena.get_mut(&body).unwrap().copy_from_slice(b" world");
//!
//! // Describe both chunks as one logical byte stream.
//! let mut iov = ScatterGather::stackalloc(2, &mut arena).unwrap();
//! iov.push(head.into()).unwrap();
//! iov.push(body.into()).unwrap();
//! assert_eq!(iov.total_len(), 11);
//!
//! // Zero-copy sub-range: "lo wo".
//! let middle = iov.slice(3, 5);
//! assert_eq!(middle.gather(&arena).unwrap(), b"lo wo");
//!
//! // Everything allocated since enter() is reclaimed at once.
//! arena.leave();
//! assert_eq!(arena.used(), 0);
//!
//! // The vector's slots are charged to the arena's tag too.
//! drop(iov);
//! assert_eq!(allocator.stat(tag).nbytes, 4096);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Tags, region ids, addresses, `Status`, `AllocError` |
//! | [`list`] | `strata-list` | Index-linked doubly- and singly-linked lists |
//! | [`alloc`] | `strata-alloc` | Tagged allocator and per-tag statistics |
//! | [`arena`] | `strata-arena` | Segmented frame arena |
//! | [`iov`] | `strata-iov` | Scatter-gather vectors, positions, slicing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Shared identifiers, status codes and the allocation error (`strata-core`).
pub use strata_core as types;

/// Intrusive-style lists over stable indices (`strata-list`).
///
/// [`list::LinkPool`] backs doubly-linked circular lists with O(1)
/// splice; [`list::SLinkPool`] backs singly-linked stacks.
pub use strata_list as list;

/// Tagged heap allocation with live statistics (`strata-alloc`).
///
/// [`alloc::TagAllocator`] hands out [`alloc::TaggedBuf`]s and keeps
/// per-tag allocation and byte counts.
pub use strata_alloc as alloc;

/// Segmented frame arena (`strata-arena`).
///
/// [`arena::FrameArena`] bump-allocates request-scoped memory with nested
/// `enter()`/`leave()` frames.
pub use strata_arena as arena;

/// Scatter-gather vectors (`strata-iov`).
///
/// [`iov::ScatterGather`] addresses a byte stream spread over several
/// regions and slices it without copying payload.
pub use strata_iov as iov;

/// Common imports for typical strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use strata_core::{Addr, AllocError, AllocTag, RegionId, Status, StatusOrigin};

    // Allocator
    pub use strata_alloc::{AllocStat, TagAllocator, TaggedBuf};

    // Arena
    pub use strata_arena::{ArenaConfig, ArenaError, ArenaSpan, FrameArena};

    // Scatter-gather
    pub use strata_iov::{IovError, Position, ResolveSpan, ScatterGather, Span};
}
