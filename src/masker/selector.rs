//! Masker selection from mask contents

use log::info;

use crate::image::errors::{RoiError, RoiResult};
use crate::image::types::LabelImage;
use crate::masker::config::MaskerConfig;
use crate::masker::engine::Masker;

/// Choose and build a masker for a mask image
///
/// A single non-background label selects a binary masker, several labels
/// select a labels masker, and a mask without any label is an error.
///
/// # Arguments
/// * `mask` - Mask or atlas image, 0 is background
/// * `config` - Cleaning options passed through to the masker
pub fn set_masker(mask: &LabelImage, config: MaskerConfig) -> RoiResult<Masker> {
    config.validate()?;

    let labels = mask.distinct_labels();
    info!("  {} region(s) detected from {}", labels.len(), mask.name());

    match labels.len() {
        0 => Err(RoiError::NoRegionDetected(mask.name())),
        1 => Ok(Masker::binary(mask, config)),
        _ => Ok(Masker::from_atlas(mask, config)),
    }
}
