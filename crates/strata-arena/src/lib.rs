//! Segmented frame arena for request-scoped allocation.
//!
//! A [`FrameArena`] bump-allocates from fixed-size segments charged to a
//! tag in the [`strata_alloc`] allocator. Frames bracket a region of work:
//! [`FrameArena::enter`] remembers the bump pointer and
//! [`FrameArena::leave`] rewinds to it, releasing any segments grown in
//! between.
//!
//! ```text
//! FrameArena
//! ├── current: Segment            (TaggedBuf<u8> + cursor)
//! ├── older: SListHead ──► SLinkPool<Segment>   (newest first)
//! └── frames: Vec<BumpPointer>    (one mark per enter())
//! ```
//!
//! Allocations are addressed by [`ArenaSpan`] handles rather than
//! references, so the arena can keep allocating while earlier results are
//! still held. A handle resolves only while its bytes remain below the
//! cursor of a live segment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod frame;
pub mod handle;
pub mod segment;

pub use config::ArenaConfig;
pub use error::ArenaError;
pub use frame::FrameArena;
pub use handle::{ArenaSpan, BumpPointer};
