//! Turning span descriptors back into bytes.

use strata_alloc::TaggedBuf;
use strata_arena::FrameArena;

use crate::span::Span;
use crate::vector::ScatterGather;

/// Memory that span descriptors can point into.
pub trait ResolveSpan {
    /// The bytes `span` describes, or `None` if they do not lie in this
    /// memory.
    fn resolve_span(&self, span: &Span) -> Option<&[u8]>;
}

impl ResolveSpan for TaggedBuf<u8> {
    fn resolve_span(&self, span: &Span) -> Option<&[u8]> {
        self.resolve(span.addr, span.len)
    }
}

impl ResolveSpan for FrameArena {
    fn resolve_span(&self, span: &Span) -> Option<&[u8]> {
        self.resolve(span.addr, span.len)
    }
}

impl<R: ResolveSpan> ResolveSpan for [R] {
    fn resolve_span(&self, span: &Span) -> Option<&[u8]> {
        self.iter().find_map(|r| r.resolve_span(span))
    }
}

impl<R: ResolveSpan + ?Sized> ResolveSpan for &R {
    fn resolve_span(&self, span: &Span) -> Option<&[u8]> {
        (**self).resolve_span(span)
    }
}

impl ScatterGather {
    /// Copy the vector's byte stream into `out`, stopping when either runs
    /// out. Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Returns the first non-empty span that `source` cannot resolve.
    pub fn gather_into<R>(&self, out: &mut [u8], source: &R) -> Result<usize, Span>
    where
        R: ResolveSpan + ?Sized,
    {
        let mut copied = 0;
        for span in self.spans() {
            if copied == out.len() {
                break;
            }
            if span.is_empty() {
                continue;
            }
            let bytes = source.resolve_span(span).ok_or(*span)?;
            let n = bytes.len().min(out.len() - copied);
            out[copied..copied + n].copy_from_slice(&bytes[..n]);
            copied += n;
        }
        Ok(copied)
    }

    /// The whole byte stream as one contiguous buffer.
    ///
    /// # Errors
    ///
    /// Returns the first non-empty span that `source` cannot resolve.
    pub fn gather<R>(&self, source: &R) -> Result<Vec<u8>, Span>
    where
        R: ResolveSpan + ?Sized,
    {
        let mut out = vec![0; self.total_len()];
        self.gather_into(&mut out, source)?;
        Ok(out)
    }
}
