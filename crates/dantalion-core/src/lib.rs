//! # Dantalion Core
//!
//! Error taxonomy, validated value types, and entropy math for the
//! Dantalion sequence-synthesis library.
//!
//! Dantalion is named after the 71st demon of the Ars Goetia, who shows
//! visions in any likeness - just as the library conjures byte streams in
//! the likeness of any target entropy.
//!
//! ## Contents
//!
//! - [`shannon_entropy`] - order-0 empirical entropy of a byte buffer
//! - [`EntropyTarget`] / [`SampleRatio`] - validated value types
//! - [`Compressor`] - the reference-compressor seam used by calibration
//! - [`Error`] / [`Result`] - the shared error taxonomy

pub mod entropy;
pub mod error;
pub mod traits;
pub mod types;

pub use entropy::{entropy_of_parts, shannon_entropy};
pub use error::{Error, Result};
pub use traits::Compressor;
pub use types::{EntropyTarget, SampleRatio};
