//! Strongly-typed identifiers: allocation tags, region identities, and addresses.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies the subsystem that made a heap allocation.
///
/// By convention a tag is four ASCII characters packed big-endian, so
/// `AllocTag::new(*b"test")` has the value `0x7465_7374` and renders back
/// as `"test"`. [`AllocTag::UNTAGGED`] marks allocations with no owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AllocTag(pub u32);

impl AllocTag {
    /// The tag used for allocations that do not name a subsystem.
    pub const UNTAGGED: AllocTag = AllocTag(0);

    /// Pack four characters into a tag.
    pub const fn new(chars: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(chars))
    }

    /// The four characters this tag was built from, first character first.
    pub const fn to_chars(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Low four bits of the tag, used to pick a statistics bucket.
    pub const fn bucket(self) -> usize {
        (self.0 & 0xf) as usize
    }
}

impl fmt::Display for AllocTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_chars() {
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<[u8; 4]> for AllocTag {
    fn from(chars: [u8; 4]) -> Self {
        Self::new(chars)
    }
}

impl From<u32> for AllocTag {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`RegionId`] allocation.
static REGION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of one contiguous backing allocation.
///
/// Every tagged heap buffer and every arena segment receives a fresh id
/// when it is created. Ids are never reused within a process, so an
/// [`Addr`] that names a released region can be detected instead of
/// silently resolving into whatever memory replaced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl RegionId {
    /// A placeholder id that no live region ever carries.
    pub const NONE: RegionId = RegionId(0);

    /// Allocate a fresh, unique region id. Thread-safe.
    pub fn next() -> Self {
        Self(REGION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A byte address: an offset within a backing region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Addr {
    /// Region the address points into.
    pub region: RegionId,
    /// Byte offset from the start of the region.
    pub offset: usize,
}

impl Addr {
    /// Build an address.
    pub const fn new(region: RegionId, offset: usize) -> Self {
        Self { region, offset }
    }

    /// The address `bytes` further into the same region.
    #[must_use]
    pub const fn add(self, bytes: usize) -> Self {
        Self {
            region: self.region,
            offset: self.offset + bytes,
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.region, self.offset)
    }
}
