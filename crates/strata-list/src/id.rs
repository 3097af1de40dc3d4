//! Node and list identifiers.

use std::fmt;

/// Stable handle to a node inside a [`LinkPool`](crate::LinkPool) or
/// [`SLinkPool`](crate::SLinkPool).
///
/// Encodes the slot index and the slot's generation at the time the node
/// was inserted. Releasing the node bumps the generation, which makes the
/// old id stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index within the owning pool.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when this id was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}@{}", self.slot, self.generation)
    }
}

/// Handle to a list's sentinel inside a [`LinkPool`](crate::LinkPool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListId(pub(crate) NodeId);

impl ListId {
    /// The sentinel node backing this list.
    pub fn sentinel(&self) -> NodeId {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}@{}", self.0.slot, self.0.generation)
    }
}
