//! Sampling entropy estimation.
//!
//! Estimates full-buffer entropy from a uniformly drawn sub-sample,
//! scaled by an empirically fitted correction factor. The factors are
//! opaque calibration data, fitted for exactly two sample ratios; other
//! ratios have no defined correction and are rejected before any trial
//! runs rather than silently passed through.

use dantalion_core::{shannon_entropy, EntropyTarget, Error, Result, SampleRatio};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::synth::{SynthConfig, Synthesizer};

/// Fitted correction factors by sample ratio.
const CORRECTIONS: &[(f64, f64)] = &[(0.05, 1.143), (0.1, 1.07)];

/// One estimation trial: the measured entropy of the full buffer, and the
/// corrected entropy estimated from the sub-sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleEstimate {
    /// Entropy of the whole synthesized buffer.
    pub full_entropy: f64,
    /// Corrected entropy of the drawn sample.
    pub sample_entropy: f64,
}

/// Correction factor fitted for `ratio`, if one exists.
pub fn correction_factor(ratio: SampleRatio) -> Option<f64> {
    CORRECTIONS
        .iter()
        .find(|(fitted, _)| (ratio.value() - fitted).abs() < 1e-9)
        .map(|&(_, factor)| factor)
}

/// Runs repeated sample-versus-full entropy trials.
pub struct SampleEstimator {
    synth: Synthesizer,
    ratio: SampleRatio,
    correction: f64,
    rng: StdRng,
}

impl SampleEstimator {
    /// Estimator with the default synthesis configuration.
    pub fn new(ratio: SampleRatio) -> Result<Self> {
        Self::with_config(ratio, SynthConfig::default())
    }

    /// Estimator with an explicit synthesis configuration. Fails up front
    /// when no correction factor is fitted for `ratio`.
    pub fn with_config(ratio: SampleRatio, config: SynthConfig) -> Result<Self> {
        let correction =
            correction_factor(ratio).ok_or(Error::UnsupportedSampleRatio(ratio.value()))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            synth: Synthesizer::with_config(config),
            ratio,
            correction,
            rng,
        })
    }

    /// The correction factor applied to raw sample entropy.
    pub fn correction(&self) -> f64 {
        self.correction
    }

    /// Run one independent trial: synthesize a fresh buffer, measure it,
    /// draw `floor(n * ratio)` bytes uniformly with replacement, and
    /// correct the sample's entropy. Synthesis failures surface as-is;
    /// this layer does not retry.
    pub fn trial(&mut self, n: usize, target: EntropyTarget) -> Result<SampleEstimate> {
        let synthesized = self.synth.synthesize(n, target)?;
        let full_entropy = synthesized.entropy;

        let sample_len = self.ratio.sample_len(n);
        let sample: Vec<u8> = (0..sample_len)
            .map(|_| synthesized.bytes[self.rng.gen_range(0..synthesized.bytes.len())])
            .collect();

        let raw = shannon_entropy(&sample)?;
        let sample_entropy = raw * self.correction;
        debug!(full_entropy, sample_entropy, sample_len, "sampling trial");

        Ok(SampleEstimate {
            full_entropy,
            sample_entropy,
        })
    }

    /// Lazy stream of `count` independent trials. Each `next` call runs
    /// one synthesis; a failed trial yields its error and the stream
    /// continues with the remaining trials.
    pub fn trials(&mut self, n: usize, target: EntropyTarget, count: usize) -> Trials<'_> {
        Trials {
            estimator: self,
            n,
            target,
            remaining: count,
        }
    }
}

/// Iterator over estimation trials.
pub struct Trials<'a> {
    estimator: &'a mut SampleEstimator,
    n: usize,
    target: EntropyTarget,
    remaining: usize,
}

impl Iterator for Trials<'_> {
    type Item = Result<SampleEstimate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.estimator.trial(self.n, self.target))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
