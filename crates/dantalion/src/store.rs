//! Calibration cache persistence.
//!
//! The cache is a flat JSON object mapping one-decimal ratio strings to
//! entropy values. It is read wholesale at startup when present and
//! written wholesale once after a successful build. Stale or corrupted
//! caches are not validated here; deleting the file forces a rebuild.

use std::fs;
use std::path::Path;

use dantalion_core::{Compressor, Error, Result};
use tracing::{debug, info};

use crate::calibrate::{CalibrationMap, Calibrator};
use crate::synth::Synthesizer;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "ratio-calibration.json";

/// Load a persisted map, or `None` when no cache exists yet.
pub fn load_map(path: &Path) -> Result<Option<CalibrationMap>> {
    if !path.exists() {
        debug!(path = %path.display(), "no calibration cache");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)?;
    let map = serde_json::from_str(&raw).map_err(|err| Error::cache(err.to_string()))?;
    debug!(path = %path.display(), "calibration cache loaded");
    Ok(Some(map))
}

/// Persist a freshly built map.
pub fn save_map(path: &Path, map: &CalibrationMap) -> Result<()> {
    let raw = serde_json::to_string(map).map_err(|err| Error::cache(err.to_string()))?;
    fs::write(path, raw)?;
    info!(path = %path.display(), entries = map.len(), "calibration cache written");
    Ok(())
}

/// Load the cached map, or build one and persist it for the next caller.
pub fn load_or_build(
    path: &Path,
    calibrator: &Calibrator,
    synth: &mut Synthesizer,
    compressor: &dyn Compressor,
) -> Result<CalibrationMap> {
    if let Some(map) = load_map(path)? {
        return Ok(map);
    }
    let map = calibrator.build(synth, compressor)?;
    save_map(path, &map)?;
    Ok(map)
}
