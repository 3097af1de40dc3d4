//! Benchmark workloads for the strata memory runtime.
//!
//! Provides deterministic, seeded inputs so runs are comparable:
//!
//! - [`request_sizes`]: allocation sizes for arena and allocator churn
//! - [`tag_set`]: tags spread evenly over the statistics buckets
//! - [`fragmented_vector`]: a scatter-gather vector over many short spans

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{Addr, AllocTag, RegionId};
use strata_iov::{ScatterGather, Span};

/// `n` sizes in `1..=max`, reproducible from `seed`.
pub fn request_sizes(seed: u64, n: usize, max: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| 1 + (rng.next_u64() % max as u64) as usize)
        .collect()
}

/// `n` distinct tags cycling through all sixteen statistics buckets.
pub fn tag_set(n: u32) -> Vec<AllocTag> {
    (0..n).map(|i| AllocTag(0x6200_0000 | i)).collect()
}

/// A vector of `spans` spans with lengths in `1..=max_len`, laid out back
/// to back in one synthetic region.
pub fn fragmented_vector(seed: u64, spans: usize, max_len: usize) -> ScatterGather {
    let region = RegionId::next();
    let mut v = ScatterGather::new(spans);
    let mut offset = 0;
    for len in request_sizes(seed, spans, max_len) {
        v.push(Span::new(Addr::new(region, offset), len))
            .expect("capacity equals span count");
        offset += len;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_sizes_deterministic() {
        let a = request_sizes(42, 100, 64);
        let b = request_sizes(42, 100, 64);
        assert_eq!(a, b);
        assert!(a.iter().all(|&n| (1..=64).contains(&n)));
    }

    #[test]
    fn tag_set_covers_every_bucket() {
        let tags = tag_set(32);
        let mut seen = [0; 16];
        for tag in tags {
            seen[tag.bucket()] += 1;
        }
        assert!(seen.iter().all(|&n| n == 2));
    }

    #[test]
    fn fragmented_vector_is_full() {
        let v = fragmented_vector(7, 64, 16);
        assert_eq!(v.len(), 64);
        assert_eq!(v.len(), v.capacity());
        assert_eq!(v.total_len(), request_sizes(7, 64, 16).iter().sum::<usize>());
    }
}
