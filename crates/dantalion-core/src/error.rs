//! Error types for sequence synthesis and calibration.

use thiserror::Error;

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Synthesis and calibration error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Entropy target outside the supported range.
    #[error("entropy target {value} out of range [{min}, {max}]")]
    InvalidEntropy { value: f64, min: f64, max: f64 },

    /// Sample ratio outside (0, 1].
    #[error("sample ratio {0} out of range (0, 1]")]
    InvalidSampleRatio(f64),

    /// No correction factor has been fitted for this sample ratio.
    #[error("no correction factor fitted for sample ratio {0}")]
    UnsupportedSampleRatio(f64),

    /// Entropy requested for an empty buffer.
    #[error("cannot measure entropy of an empty buffer")]
    EmptyInput,

    /// The partition search ran out of budget or escaped its bounds.
    /// Retrying the same call with fresh randomness is sensible.
    #[error("entropy search did not converge within {iterations} iterations")]
    SearchExhausted { iterations: usize },

    /// No calibrated entropy exists at or above the requested ratio.
    #[error("compression ratio {ratio:.1} is too high to be achieved")]
    RatioNotAchievable { ratio: f64 },

    /// Malformed configuration or missing argument.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Algorithm-specific error.
    #[error("{algorithm} error: {message}")]
    Algorithm {
        algorithm: &'static str,
        message: String,
    },

    /// I/O error from the cache or output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Calibration cache could not be decoded or encoded.
    #[error("calibration cache error: {0}")]
    Cache(String),
}

impl Error {
    /// Create a search exhaustion error.
    pub fn search_exhausted(iterations: usize) -> Self {
        Error::SearchExhausted { iterations }
    }

    /// Create a not-achievable ratio error.
    pub fn ratio_not_achievable(ratio: f64) -> Self {
        Error::RatioNotAchievable { ratio }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Create an algorithm-specific error.
    pub fn algorithm(algorithm: &'static str, message: impl Into<String>) -> Self {
        Error::Algorithm {
            algorithm,
            message: message.into(),
        }
    }

    /// Create a calibration cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Error::Cache(message.into())
    }

    /// Check if error is retryable (fresh randomness may succeed).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::SearchExhausted { .. })
    }

    /// Get error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidEntropy { .. } => "invalid_entropy",
            Error::InvalidSampleRatio(_) => "invalid_sample_ratio",
            Error::UnsupportedSampleRatio(_) => "unsupported_sample_ratio",
            Error::EmptyInput => "empty_input",
            Error::SearchExhausted { .. } => "search_exhausted",
            Error::RatioNotAchievable { .. } => "ratio_not_achievable",
            Error::Config(_) => "config",
            Error::Algorithm { .. } => "algorithm_error",
            Error::Io(_) => "io_error",
            Error::Cache(_) => "cache_error",
        }
    }
}
