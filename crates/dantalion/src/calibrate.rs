//! Compression-ratio calibration.
//!
//! Relates achievable compression ratios to the entropy values that
//! produce them on a fixed-size sample. Building the map costs one
//! synthesis-plus-compression run per grid point, so callers build it once
//! and persist it (see [`crate::store`]).

use std::collections::BTreeMap;

use dantalion_core::entropy::round_to;
use dantalion_core::{Compressor, EntropyTarget, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::synth::Synthesizer;

/// Entropy grid the calibrator sweeps, in tenths: 0.1 through 7.9.
const GRID_TENTHS: std::ops::Range<u32> = 1..80;

/// Upper bound of the fallback ratio search, in tenths (ratio 40.0).
const MAX_RATIO_TENTHS: i64 = 400;

/// Empirical map from rounded compression ratio to the entropy value that
/// produced it. Keys are one-decimal ratio strings, which is also the
/// persisted JSON form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationMap {
    entries: BTreeMap<String, f64>,
}

impl CalibrationMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ratio -> entropy` under the one-decimal rounded ratio.
    ///
    /// A later insert at the same rounded ratio overwrites the earlier
    /// one. The build sweeps entropy upward, so the higher entropy wins a
    /// collision; that lossy behavior is part of the calibration contract.
    pub fn insert(&mut self, ratio: f64, entropy: f64) {
        self.entries.insert(ratio_key(round_tenths(ratio)), entropy);
    }

    /// Entropy for the nearest achievable ratio at or above `ratio`.
    ///
    /// The request is rounded to one decimal and searched upward in 0.1
    /// steps to 40.0; beyond that the ratio is reported as not achievable.
    pub fn entropy_for(&self, ratio: f64) -> Result<f64> {
        let requested = round_tenths(ratio);
        let mut tenths = requested;
        while tenths <= MAX_RATIO_TENTHS {
            if let Some(&entropy) = self.entries.get(&ratio_key(tenths)) {
                return Ok(entropy);
            }
            tenths += 1;
        }
        Err(Error::ratio_not_achievable(requested as f64 / 10.0))
    }

    /// Number of calibrated grid points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries as `(ratio key, entropy)` in ratio-string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, &entropy)| (key.as_str(), entropy))
    }
}

fn round_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

fn ratio_key(tenths: i64) -> String {
    format!("{:.1}", tenths as f64 / 10.0)
}

/// Builds a [`CalibrationMap`] by sweeping the entropy grid.
#[derive(Debug, Clone)]
pub struct Calibrator {
    /// Buffer size synthesized and compressed per grid point.
    pub sample_size: usize,
    /// Synthesis retries per grid point before the point is skipped.
    pub retries: usize,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self {
            sample_size: 4096,
            retries: 20,
        }
    }
}

impl Calibrator {
    /// Calibrator with the default sample size and retry budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweep the entropy grid, synthesizing and compressing one sample per
    /// point. Grid points whose synthesis stays exhausted after the retry
    /// budget are skipped; the map simply omits them. Compressor failures
    /// propagate.
    pub fn build(
        &self,
        synth: &mut Synthesizer,
        compressor: &dyn Compressor,
    ) -> Result<CalibrationMap> {
        info!(
            sample_size = self.sample_size,
            level = compressor.level(),
            "building calibration map"
        );

        let mut map = CalibrationMap::new();
        for tenth in GRID_TENTHS {
            let entropy = f64::from(tenth) / 10.0;
            let target = EntropyTarget::new(entropy)?;

            let synthesized =
                match synth.synthesize_with_retry(self.sample_size, target, self.retries) {
                    Ok(synthesized) => synthesized,
                    Err(err) => {
                        warn!(entropy, %err, "grid point skipped");
                        continue;
                    }
                };

            let compressed = compressor.compress(&synthesized.bytes)?;
            let ratio = self.sample_size as f64 / compressed.len() as f64;
            debug!(
                entropy,
                ratio,
                compressed_len = compressed.len(),
                "grid point calibrated"
            );
            map.insert(ratio, round_to(entropy, 1));
        }

        info!(entries = map.len(), "calibration map built");
        Ok(map)
    }
}
