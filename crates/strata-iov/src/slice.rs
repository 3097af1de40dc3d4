//! Zero-copy sub-ranges of a scatter-gather vector.
//!
//! A slice copies span descriptors, never payload: the result points at
//! the same memory as the base vector with its first and last spans
//! trimmed to the requested byte range.

use strata_alloc::TagAllocator;
use strata_arena::FrameArena;
use strata_core::AllocTag;

use crate::error::IovError;
use crate::span::Position;
use crate::vector::ScatterGather;

impl ScatterGather {
    /// First and last byte positions of `[offset, offset + size)`, with
    /// `size` clamped to what the vector holds past `offset`. `None` when
    /// the range is empty.
    fn slice_bounds(&self, offset: usize, size: usize) -> Option<(Position, Position)> {
        let total = self.total_len();
        if offset >= total {
            return None;
        }
        let size = size.min(total - offset);
        if size == 0 {
            return None;
        }
        let first = self.at(offset);
        let last = self.advance(first, size - 1);
        Some((first, last))
    }

    /// Number of spans a slice of `size` bytes at `offset` touches.
    pub fn measure_slice(&self, offset: usize, size: usize) -> usize {
        self.slice_bounds(offset, size)
            .map_or(0, |(first, last)| last.index - first.index + 1)
    }

    /// Write the spans covering `[offset, offset + size)` into `dest`,
    /// replacing its contents.
    ///
    /// # Panics
    ///
    /// Panics if `dest` has fewer slots than
    /// [`measure_slice`](Self::measure_slice) reports.
    pub fn slice_into(&self, dest: &mut ScatterGather, offset: usize, size: usize) {
        dest.clear();
        let Some((first, last)) = self.slice_bounds(offset, size) else {
            return;
        };
        let n = last.index - first.index + 1;
        assert!(
            n <= dest.capacity(),
            "slice needs {n} spans but destination holds {}",
            dest.capacity()
        );

        let slots = dest.slots_mut();
        slots[..n].copy_from_slice(&self.spans()[first.index..=last.index]);
        // Trim the tail first: for a single-span slice both trims apply to
        // the same slot and the tail length is measured from the span start.
        slots[n - 1].len = last.offset + 1;
        slots[0].addr = slots[0].addr.add(first.offset);
        slots[0].len -= first.offset;
        dest.set_len(n);
    }

    /// A new inline vector holding the slice `[offset, offset + size)`.
    pub fn slice(&self, offset: usize, size: usize) -> ScatterGather {
        let mut dest = ScatterGather::new(self.measure_slice(offset, size));
        self.slice_into(&mut dest, offset, size);
        dest
    }

    /// Like [`slice`](Self::slice), with the destination's slots charged
    /// to `tag` in `allocator`.
    pub fn alloc_slice(
        &self,
        offset: usize,
        size: usize,
        allocator: &TagAllocator,
        tag: AllocTag,
    ) -> Result<ScatterGather, IovError> {
        let mut dest = ScatterGather::alloc(self.measure_slice(offset, size), allocator, tag)?;
        self.slice_into(&mut dest, offset, size);
        Ok(dest)
    }

    /// Like [`slice`](Self::slice), with the destination built by
    /// [`stackalloc`](Self::stackalloc) in `arena`.
    pub fn stackalloc_slice(
        &self,
        offset: usize,
        size: usize,
        arena: &mut FrameArena,
    ) -> Result<ScatterGather, IovError> {
        let mut dest = ScatterGather::stackalloc(self.measure_slice(offset, size), arena)?;
        self.slice_into(&mut dest, offset, size);
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use strata_arena::ArenaConfig;
    use strata_core::{Addr, RegionId};

    fn three_by_four() -> ScatterGather {
        let mut v = ScatterGather::new(3);
        for _ in 0..3 {
            v.push(Span::new(Addr::new(RegionId::next(), 0), 4)).unwrap();
        }
        v
    }

    #[test]
    fn slice_trims_both_ends() {
        let v = three_by_four();
        assert_eq!(v.measure_slice(2, 6), 2);
        let s = v.slice(2, 6);
        assert_eq!(s.len(), 2);
        assert_eq!(s.spans()[0], Span::new(v.spans()[0].addr.add(2), 2));
        assert_eq!(s.spans()[1], v.spans()[1]);
        assert_eq!(s.total_len(), 6);
    }

    #[test]
    fn full_slice_is_identical() {
        let v = three_by_four();
        let s = v.slice(0, 12);
        assert_eq!(s.spans(), v.spans());
    }

    #[test]
    fn slice_within_one_span() {
        let v = three_by_four();
        let s = v.slice(5, 2);
        assert_eq!(s.spans(), &[Span::new(v.spans()[1].addr.add(1), 2)]);
    }

    #[test]
    fn slice_starting_on_boundary() {
        let v = three_by_four();
        let s = v.slice(4, 5);
        assert_eq!(s.len(), 2);
        assert_eq!(s.spans()[0], v.spans()[1]);
        assert_eq!(s.spans()[1], Span::new(v.spans()[2].addr, 1));
    }

    #[test]
    fn size_is_clamped() {
        let v = three_by_four();
        let s = v.slice(10, 100);
        assert_eq!(s.spans(), &[Span::new(v.spans()[2].addr.add(2), 2)]);
    }

    #[test]
    fn empty_ranges_have_no_spans() {
        let v = three_by_four();
        assert_eq!(v.measure_slice(12, 4), 0);
        assert_eq!(v.measure_slice(3, 0), 0);
        assert!(v.slice(3, 0).is_empty());
        assert!(v.slice(20, 1).is_empty());
    }

    #[test]
    fn slice_into_replaces_contents() {
        let v = three_by_four();
        let mut dest = ScatterGather::new(3);
        v.slice_into(&mut dest, 0, 12);
        v.slice_into(&mut dest, 1, 1);
        assert_eq!(dest.len(), 1);
        assert_eq!(dest.total_len(), 1);
    }

    #[test]
    #[should_panic(expected = "destination holds 1")]
    fn undersized_destination_panics() {
        let v = three_by_four();
        let mut dest = ScatterGather::new(1);
        v.slice_into(&mut dest, 2, 6);
    }

    #[test]
    fn alloc_slice_charges_exact_span_count() {
        let alloc = TagAllocator::new();
        let tag = AllocTag::new(*b"slic");
        let v = three_by_four();
        let s = v.alloc_slice(2, 6, &alloc, tag).unwrap();
        assert_eq!(s.capacity(), 2);
        assert_eq!(s.spans(), v.slice(2, 6).spans());
        assert_eq!(alloc.stat(tag).nalloc, 1);
    }

    #[test]
    fn stackalloc_slice_lives_in_frame() {
        let alloc = TagAllocator::new();
        let tag = AllocTag::new(*b"stak");
        let mut arena = FrameArena::new(ArenaConfig::new(1024, tag), &alloc).unwrap();
        let v = three_by_four();
        arena.enter().unwrap();
        let s = v.stackalloc_slice(0, 12, &mut arena).unwrap();
        assert_eq!(s.spans(), v.spans());
        assert_eq!(arena.used(), ScatterGather::measure(3));
        // One segment plus the slice's slots, all under the arena's tag.
        let stat = alloc.stat(tag);
        assert_eq!((stat.nalloc, stat.nbytes), (2, 1024 + (3 * crate::SPAN_BYTES) as u64));
        arena.leave();
        assert_eq!(arena.used(), 0);
        drop(s);
        assert_eq!(alloc.stat(tag).nalloc, 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn slice_covers_exactly_the_range(
                lens in prop::collection::vec(0usize..8, 1..10),
                offset in 0usize..60,
                size in 0usize..60,
            ) {
                let region = RegionId::next();
                let mut v = ScatterGather::new(lens.len());
                let mut at = 0;
                for len in lens {
                    v.push(Span::new(Addr::new(region, at), len)).unwrap();
                    at += len;
                }
                let total = v.total_len();
                let s = v.slice(offset, size);
                let expected = size.min(total.saturating_sub(offset));
                prop_assert_eq!(s.total_len(), expected);
                prop_assert_eq!(s.len(), v.measure_slice(offset, size));
                // Spans are laid out back to back in one region, so the
                // slice must be one contiguous run starting at `offset`.
                let mut cursor = offset;
                for span in s.spans() {
                    prop_assert_eq!(span.addr, Addr::new(region, cursor));
                    cursor += span.len;
                }
            }
        }
    }
}
