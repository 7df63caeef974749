//! NIfTI image handling
//!
//! This module provides the image types, the NIfTI reader, leading scan
//! removal and the crate-wide error type.

pub mod errors;
pub mod reader;
pub mod trim;
pub(crate) mod types;
#[cfg(test)]
pub(crate) mod tests;

pub use errors::{RoiError, RoiResult};
pub use reader::{load_functional, load_labels};
pub use trim::discard_initial_scans;
pub use types::{FunctionalImage, LabelImage};
