//! Sharded per-tag allocation statistics.
//!
//! The table has [`STAT_BUCKETS`] buckets selected by the low four bits of
//! the tag. Each bucket is its own mutex guarding a list of entries, so
//! allocations under different tags rarely contend. A lookup scans the
//! bucket's list and moves the hit to the front; entries are created on
//! first sight of a tag and never evicted.

use std::sync::{Mutex, MutexGuard, PoisonError};

use strata_core::AllocTag;
use strata_list::{LinkPool, ListId, NodeId};

/// Number of independently locked buckets in a statistics table.
pub const STAT_BUCKETS: usize = 16;

/// Allocation counters for one tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStat {
    /// Which tag these counters measure.
    pub tag: AllocTag,
    /// Number of live allocations.
    pub nalloc: u64,
    /// Number of live payload bytes.
    pub nbytes: u64,
}

impl AllocStat {
    /// Zeroed counters for `tag`.
    pub fn new(tag: AllocTag) -> Self {
        Self {
            tag,
            nalloc: 0,
            nbytes: 0,
        }
    }
}

/// One hash bucket: a recency-ordered list of stat entries.
struct StatBucket {
    entries: LinkPool<AllocStat>,
    list: ListId,
}

impl StatBucket {
    fn new() -> Self {
        let mut entries = LinkPool::new();
        let list = entries.new_list();
        Self { entries, list }
    }

    /// Locate the entry for `tag`, creating it if needed, and move it to
    /// the head of the bucket.
    fn touch(&mut self, tag: AllocTag) -> NodeId {
        let found = self
            .entries
            .iter(self.list)
            .find(|(_, stat)| stat.tag == tag)
            .map(|(id, _)| id);

        match found {
            Some(id) => {
                self.entries.remove(id);
                self.entries.prepend(self.list, id);
                id
            }
            None => {
                tracing::trace!(%tag, "new allocation tag");
                let id = self.entries.insert(AllocStat::new(tag));
                self.entries.prepend(self.list, id);
                id
            }
        }
    }

    fn entry(&mut self, tag: AllocTag) -> &mut AllocStat {
        let id = self.touch(tag);
        match self.entries.get_mut(id) {
            Some(stat) => stat,
            None => unreachable!("stat entry for '{tag}' vanished"),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &AllocStat> {
        self.entries.iter(self.list).map(|(_, stat)| stat)
    }
}

/// The full statistics table.
pub(crate) struct StatTable {
    buckets: [Mutex<StatBucket>; STAT_BUCKETS],
}

impl StatTable {
    pub(crate) fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Mutex::new(StatBucket::new())),
        }
    }

    /// Lock the bucket for `tag`.
    ///
    /// A poisoned lock is recovered: every mutation under it is a pair of
    /// integer updates, so a panicking holder cannot leave it half-written.
    fn lock(&self, tag: AllocTag) -> MutexGuard<'_, StatBucket> {
        self.buckets[tag.bucket()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn record_alloc(&self, tag: AllocTag, bytes: usize) {
        let mut bucket = self.lock(tag);
        let stat = bucket.entry(tag);
        stat.nalloc += 1;
        stat.nbytes += bytes as u64;
    }

    /// # Panics
    ///
    /// Panics if the release would drive either counter negative: that
    /// means a buffer was released twice or charged to the wrong table.
    pub(crate) fn record_free(&self, tag: AllocTag, bytes: usize) {
        let mut bucket = self.lock(tag);
        let stat = bucket.entry(tag);
        assert!(stat.nalloc > 0, "allocation count for tag '{tag}' underflow");
        assert!(
            stat.nbytes >= bytes as u64,
            "byte count for tag '{tag}' underflow: {} < {bytes}",
            stat.nbytes
        );
        stat.nalloc -= 1;
        stat.nbytes -= bytes as u64;
    }

    pub(crate) fn stat(&self, tag: AllocTag) -> AllocStat {
        *self.lock(tag).entry(tag)
    }

    /// Copy up to `buffer.len()` entries and return the number of tags.
    ///
    /// Every bucket is locked, in ascending index order, before any entry
    /// is read, so the copy reflects one instant across all tags.
    pub(crate) fn stats(&self, buffer: &mut [AllocStat]) -> usize {
        let guards: Vec<MutexGuard<'_, StatBucket>> = self
            .buckets
            .iter()
            .map(|b| b.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let mut total = 0;
        let mut slots = buffer.iter_mut();
        for bucket in &guards {
            for stat in bucket.iter() {
                total += 1;
                if let Some(slot) = slots.next() {
                    *slot = *stat;
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &[u8; 4]) -> AllocTag {
        AllocTag::new(*s)
    }

    #[test]
    fn unseen_tag_reads_zero() {
        let table = StatTable::new();
        let stat = table.stat(tag(b"none"));
        assert_eq!(stat, AllocStat::new(tag(b"none")));
    }

    #[test]
    fn alloc_and_free_balance() {
        let table = StatTable::new();
        table.record_alloc(tag(b"test"), 128);
        table.record_alloc(tag(b"test"), 32);
        let stat = table.stat(tag(b"test"));
        assert_eq!((stat.nalloc, stat.nbytes), (2, 160));

        table.record_free(tag(b"test"), 128);
        table.record_free(tag(b"test"), 32);
        let stat = table.stat(tag(b"test"));
        assert_eq!((stat.nalloc, stat.nbytes), (0, 0));
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn free_without_alloc_panics() {
        let table = StatTable::new();
        table.record_free(tag(b"test"), 8);
    }

    #[test]
    #[should_panic(expected = "byte count")]
    fn free_more_bytes_than_live_panics() {
        let table = StatTable::new();
        table.record_alloc(tag(b"test"), 8);
        table.record_free(tag(b"test"), 16);
    }

    #[test]
    fn colliding_tags_share_bucket_but_not_counters() {
        let table = StatTable::new();
        // Both tags end in 0x1 in the low nibble.
        let a = AllocTag(0x0000_0001);
        let b = AllocTag(0x0000_0011);
        assert_eq!(a.bucket(), b.bucket());
        table.record_alloc(a, 10);
        table.record_alloc(b, 20);
        table.record_alloc(b, 20);
        assert_eq!(table.stat(a).nbytes, 10);
        assert_eq!(table.stat(b).nbytes, 40);
        assert_eq!(table.stat(b).nalloc, 2);
    }

    #[test]
    fn lookup_moves_entry_to_front() {
        let mut bucket = StatBucket::new();
        let a = AllocTag(0x10);
        let b = AllocTag(0x20);
        let c = AllocTag(0x30);
        bucket.entry(a);
        bucket.entry(b);
        bucket.entry(c);
        let order: Vec<_> = bucket.iter().map(|s| s.tag).collect();
        assert_eq!(order, vec![c, b, a]);

        bucket.entry(a);
        let order: Vec<_> = bucket.iter().map(|s| s.tag).collect();
        assert_eq!(order, vec![a, c, b]);
        bucket.entries.check_links(bucket.list);
    }

    #[test]
    fn stats_reports_total_even_when_buffer_short() {
        let table = StatTable::new();
        for i in 0..5u32 {
            table.record_alloc(AllocTag(i), 1);
        }
        let mut buffer = [AllocStat::default(); 2];
        assert_eq!(table.stats(&mut buffer), 5);
        assert!(buffer.iter().all(|s| s.nalloc == 1));
    }

    #[test]
    fn stats_leaves_excess_buffer_untouched() {
        let table = StatTable::new();
        table.record_alloc(tag(b"only"), 4);
        let marker = AllocStat {
            tag: tag(b"mark"),
            nalloc: 99,
            nbytes: 99,
        };
        let mut buffer = [marker; 3];
        assert_eq!(table.stats(&mut buffer), 1);
        assert_eq!(buffer[0].tag, tag(b"only"));
        assert_eq!(buffer[1], marker);
        assert_eq!(buffer[2], marker);
    }

    #[test]
    fn empty_buffer_still_counts() {
        let table = StatTable::new();
        table.record_alloc(tag(b"aaaa"), 1);
        table.record_alloc(tag(b"bbbb"), 1);
        assert_eq!(table.stats(&mut []), 2);
    }
}
