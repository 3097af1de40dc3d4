//! Scatter-gather fixtures over real memory.

use strata_alloc::{TagAllocator, TaggedBuf};
use strata_arena::{ArenaError, FrameArena};
use strata_core::AllocTag;
use strata_iov::{ScatterGather, Span};

/// `len` bytes counting up from zero, wrapping at 251 so that runs never
/// line up with power-of-two span lengths.
pub fn fill_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// One tagged buffer per entry of `lens`, and a vector with one span over
/// each. Gathering the vector yields `fill_pattern(lens.iter().sum())`.
pub fn spans_over(
    allocator: &TagAllocator,
    tag: AllocTag,
    lens: &[usize],
) -> (Vec<TaggedBuf<u8>>, ScatterGather) {
    let pattern = fill_pattern(lens.iter().sum());
    let mut bufs = Vec::with_capacity(lens.len());
    let mut v = ScatterGather::new(lens.len());
    let mut at = 0;
    for &len in lens {
        let mut buf = allocator.alloc(len, tag).unwrap();
        buf.copy_from_slice(&pattern[at..at + len]);
        v.push(Span::new(buf.addr(0), len)).unwrap();
        bufs.push(buf);
        at += len;
    }
    (bufs, v)
}

/// Allocate one arena chunk per entry of `lens` in the current frame, fill
/// them like [`spans_over`], and return a vector over them.
pub fn arena_with_chunks(
    arena: &mut FrameArena,
    lens: &[usize],
) -> Result<ScatterGather, ArenaError> {
    let pattern = fill_pattern(lens.iter().sum());
    let mut v = ScatterGather::new(lens.len());
    let mut at = 0;
    for &len in lens {
        let span = arena.alloc(len)?;
        if let Some(bytes) = arena.get_mut(&span) {
            bytes.copy_from_slice(&pattern[at..at + len]);
        }
        v.push(Span::from(span)).unwrap();
        at += len;
    }
    Ok(v)
}
