//! Chunk-and-shuffle mixing.
//!
//! The search builds sequences as a random region followed by a
//! low-information region, leaving one long homogeneous run that a real
//! compressor would exploit beyond what the target entropy implies.
//! Permuting small contiguous chunks destroys that positional structure
//! while preserving the symbol multiset, so measured entropy is invariant.

use rand::seq::SliceRandom;
use rand::Rng;

/// Inclusive bounds of the uniformly drawn chunk size.
const CHUNK_MIN: usize = 3;
const CHUNK_MAX: usize = 8;

/// Re-order `bytes` by splitting it into contiguous chunks of one random
/// size in `{3..8}` (the final chunk may be shorter) and permuting the
/// chunk order. The output length always equals the input length.
pub fn shuffle_chunks<R: Rng>(rng: &mut R, bytes: &[u8]) -> Vec<u8> {
    let size = rng.gen_range(CHUNK_MIN..=CHUNK_MAX);
    let mut chunks: Vec<&[u8]> = bytes.chunks(size).collect();
    chunks.shuffle(rng);

    let mut mixed = Vec::with_capacity(bytes.len());
    for chunk in chunks {
        mixed.extend_from_slice(chunk);
    }
    mixed
}
