//! Masking engine
//!
//! Turns a 4-D image and a mask or atlas into time series, with optional
//! detrending, confound regression and standardization.

mod config;
mod engine;
mod selector;
pub mod signal;
#[cfg(test)]
mod tests;

pub use config::MaskerConfig;
pub use engine::{LabelRegion, Masker, MaskerKind};
pub use selector::set_masker;
