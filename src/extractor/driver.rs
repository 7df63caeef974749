//! Per-image extraction driver
//!
//! Loads one functional image, builds its confounds, trims leading scans,
//! extracts the time series and writes `<basename>_timeseries.tsv`.

use log::info;
use std::path::{Path, PathBuf};

use crate::confounds::build_regressors;
use crate::extractor::mask_step::mask;
use crate::image::errors::RoiResult;
use crate::image::{discard_initial_scans, load_functional};
use crate::masker::Masker;
use crate::utils::format_utils;

/// Settings held constant for every image of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSettings {
    /// Confound columns to select from each confound file
    pub regressor_names: Option<Vec<String>>,
    /// Append realignment derivatives to the confounds
    pub realign_derivs: bool,
    /// Output individual voxels instead of the region mean
    pub as_voxels: bool,
    /// Column labels overriding the defaults
    pub labels: Option<Vec<String>>,
    /// Leading frames to drop from every image
    pub discard_scans: Option<usize>,
}

/// Run the full extraction for one image and save the result
///
/// # Arguments
/// * `masker` - Masker shared by the batch
/// * `img_path` - Functional image to extract from
/// * `output_dir` - Directory receiving the output table
/// * `settings` - Batch-wide extraction settings
/// * `regressor_file` - Confound file paired with this image, if any
///
/// # Returns
/// Path of the written table
pub fn mask_and_save(
    masker: &Masker,
    img_path: &Path,
    output_dir: &Path,
    settings: &ExtractionSettings,
    regressor_file: Option<&Path>,
) -> RoiResult<PathBuf> {
    let basename = format_utils::file_name(img_path);
    info!("  Extracting from {}", basename);

    let image = load_functional(img_path)?;

    let confounds = match regressor_file {
        Some(file) => {
            let names = settings.regressor_names.as_deref().unwrap_or(&[]);
            Some(build_regressors(file, names, settings.realign_derivs, masker.config().t_r)?)
        }
        None => None,
    };

    let (image, confounds) = match settings.discard_scans {
        Some(n) if n > 0 => discard_initial_scans(image, n, confounds)?,
        _ => (image, confounds),
    };

    let table = mask(masker, &image, confounds.as_ref(),
                     settings.labels.as_deref(), settings.as_voxels)?;

    let out_path = output_dir.join(format_utils::timeseries_file_name(img_path));
    table.save_tsv(&out_path)?;

    Ok(out_path)
}
