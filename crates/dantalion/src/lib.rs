//! # Dantalion
//!
//! Entropy-targeted byte-sequence synthesis for compression testing.
//!
//! Dantalion is named after the 71st demon of the Ars Goetia, who shows
//! visions in any likeness - the library conjures byte streams in the
//! likeness of any target entropy, for exercising storage and compression
//! subsystems against data of controlled compressibility.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dantalion::{EntropyTarget, Synthesizer};
//!
//! let mut synth = Synthesizer::new();
//! let target = EntropyTarget::new(3.0)?;
//! let sequence = synth.synthesize_with_retry(4096, target, 20)?;
//! assert_eq!(sequence.bytes.len(), 4096);
//! ```
//!
//! Callers who think in compression ratios instead of entropy values go
//! through the calibration map:
//!
//! ```ignore
//! use dantalion::{Calibrator, EntropyTarget, Synthesizer, ZstdCompressor};
//!
//! let mut synth = Synthesizer::new();
//! let map = Calibrator::new().build(&mut synth, &ZstdCompressor::new())?;
//! let target = EntropyTarget::new(map.entropy_for(3.0)?)?;
//! ```
//!
//! ## Components
//!
//! - [`synth`] - bisection-style search that lands an n-byte sequence
//!   within 0.01 bits/byte of a target entropy
//! - [`mix`] - chunk shuffling that decorrelates positional structure
//!   without touching symbol frequencies
//! - [`calibrate`] - empirical ratio-to-entropy map built against a
//!   reference compressor
//! - [`store`] - JSON cache persistence for the calibration map
//! - [`sample`] - sub-sample entropy estimation with fitted correction
//!   factors
//! - [`codec`] - the zstd reference compressor

pub mod calibrate;
pub mod codec;
pub mod mix;
pub mod sample;
pub mod store;
pub mod synth;

pub use calibrate::{CalibrationMap, Calibrator};
pub use codec::ZstdCompressor;
pub use dantalion_core::{
    shannon_entropy, Compressor, EntropyTarget, Error, Result, SampleRatio,
};
pub use sample::{SampleEstimate, SampleEstimator};
pub use synth::{SynthConfig, Synthesized, Synthesizer};
