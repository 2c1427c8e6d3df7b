//! Zstandard reference compressor.

use dantalion_core::{Compressor, Error, Result};

/// Effort level used for ratio calibration: the lowest zstd level, the
/// same level ratio lookups are answered against.
pub const CALIBRATION_LEVEL: i32 = 1;

/// One-shot zstd compressor behind the [`Compressor`] seam.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    /// Compressor at the calibration effort level.
    pub fn new() -> Self {
        Self {
            level: CALIBRATION_LEVEL,
        }
    }

    /// Compressor at an explicit zstd level.
    pub fn with_level(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for ZstdCompressor {
    fn level(&self) -> i32 {
        self.level
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        zstd::bulk::compress(input, self.level)
            .map_err(|err| Error::algorithm("zstd", err.to_string()))
    }
}
