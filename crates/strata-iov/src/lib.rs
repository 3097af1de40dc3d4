//! Scatter-gather vectors with byte-precise addressing and zero-copy
//! slicing.
//!
//! A [`ScatterGather`] describes one logical byte stream as an ordered
//! list of [`Span`]s, each naming a run of bytes in some backing region.
//! [`Position`]s address individual bytes of the stream; slicing produces
//! a new vector over the same memory with only the span boundaries
//! changed.
//!
//! ```text
//! stream:   |--- span 0 ---|-- span 1 --|------ span 2 ------|
//! regions:   TaggedBuf r7    arena seg r9   TaggedBuf r12
//! slice(offset, size) ──► |-s0'-|-- span 1 --|-s2'-|   (descriptors only)
//! ```
//!
//! Slot storage comes from one of three places: inline ([`ScatterGather::new`],
//! [`ScatterGather::single`]), the tagged allocator ([`ScatterGather::alloc`])
//! or a frame arena ([`ScatterGather::stackalloc`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod resolve;
mod slice;
pub mod span;
pub mod vector;

pub use error::IovError;
pub use resolve::ResolveSpan;
pub use span::{Position, Span};
pub use vector::{ScatterGather, HEADER_BYTES, INLINE_SPANS, SPAN_BYTES};
