//! Arena configuration parameters.

use strata_core::AllocTag;

/// Configuration for a [`FrameArena`](crate::FrameArena).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of every segment in bytes.
    ///
    /// This is also the largest single allocation the arena can serve.
    pub segment_bytes: usize,

    /// Tag charged for segment memory in the tagged allocator.
    pub tag: AllocTag,

    /// Whether a full segment may be followed by a fresh one.
    ///
    /// Default: `true`. With growth disabled the arena never holds more
    /// than its first segment and allocations fail once it is full.
    pub grows: bool,
}

impl ArenaConfig {
    /// Default segment size: one 4 KiB page.
    pub const DEFAULT_SEGMENT_BYTES: usize = 4096;

    /// Default tag for segment memory.
    pub const DEFAULT_TAG: AllocTag = AllocTag::new(*b"stak");

    /// Create a config with the given segment size and tag, growth enabled.
    pub fn new(segment_bytes: usize, tag: AllocTag) -> Self {
        Self {
            segment_bytes,
            tag,
            grows: true,
        }
    }

    /// Enable or disable segment growth.
    #[must_use]
    pub fn with_growth(mut self, grows: bool) -> Self {
        self.grows = grows;
        self
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENT_BYTES, Self::DEFAULT_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_enabled_by_default() {
        let config = ArenaConfig::new(16, AllocTag::new(*b"test"));
        assert!(config.grows);
        assert!(!config.with_growth(false).grows);
    }

    #[test]
    fn default_is_one_page() {
        let config = ArenaConfig::default();
        assert_eq!(config.segment_bytes, 4096);
        assert_eq!(config.tag.to_string(), "stak");
    }
}
