//! Intrusive-style linked lists over stable indices.
//!
//! Two list shapes are provided:
//!
//! - [`LinkPool`]: circular doubly-linked lists with a sentinel per list.
//!   Prepend, append, interior removal and whole-list splicing are O(1).
//! - [`SLinkPool`]: singly-linked stacks. Only the head is reachable in
//!   O(1), so the only mutations are [`SLinkPool::push`] and
//!   [`SLinkPool::pop`].
//!
//! # Layout
//!
//! ```text
//! LinkPool<T>
//! ├── slots: Vec<Slot<T>>     (sentinels and nodes, each with next/prev)
//! └── free_list: Vec<u32>     (released slots awaiting reuse)
//!
//! list:  [S] ⇄ [a] ⇄ [b] ⇄ [c] ⇄ back to [S]
//! empty: [S] ⇄ [S]
//! ```
//!
//! Links are slot indices inside the pool rather than pointers, so nodes
//! never need a stable address and the borrow checker sees one owner. A
//! [`NodeId`] carries a generation counter: once a node is released, every
//! id that referred to it stops resolving.
//!
//! # Invariant
//!
//! For every slot reachable from a list, `next.prev == slot` and
//! `prev.next == slot`. [`LinkPool::check_links`] walks a list and asserts
//! it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod link;
pub mod slink;

pub use id::{ListId, NodeId};
pub use link::LinkPool;
pub use slink::{SLinkPool, SListHead};
