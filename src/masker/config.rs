//! Masker configuration

use crate::image::errors::{RoiError, RoiResult};

/// Options shared by both masker kinds
///
/// These are the signal-cleaning options applied after voxels have been
/// gathered or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskerConfig {
    /// Repetition time in seconds
    pub t_r: Option<f64>,
    /// Z-score each output column
    pub standardize: bool,
    /// Remove a linear trend from signals and confounds
    pub detrend: bool,
}

impl MaskerConfig {
    /// Create a configuration with cleaning disabled
    pub fn new() -> Self {
        MaskerConfig::default()
    }

    /// Set the repetition time
    pub fn with_t_r(mut self, t_r: f64) -> Self {
        self.t_r = Some(t_r);
        self
    }

    /// Enable or disable standardization
    pub fn with_standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    /// Enable or disable linear detrending
    pub fn with_detrend(mut self, detrend: bool) -> Self {
        self.detrend = detrend;
        self
    }

    /// Check option values
    pub fn validate(&self) -> RoiResult<()> {
        if let Some(t_r) = self.t_r {
            if !t_r.is_finite() || t_r <= 0.0 {
                return Err(RoiError::Configuration(format!("t_r must be positive, got {}", t_r)));
            }
        }
        Ok(())
    }
}
