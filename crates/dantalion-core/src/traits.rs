//! Trait seam for the reference compressor.

use crate::error::Result;

/// One-shot reference compressor.
///
/// Ratio calibration only consumes the compressed length, never the
/// content, so this is the whole surface it needs.
pub trait Compressor {
    /// Effort level the compressor is configured at.
    fn level(&self) -> i32;

    /// Compress `input` in one shot.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
}
