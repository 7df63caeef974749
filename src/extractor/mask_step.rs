//! Extraction step
//!
//! Runs a masker on one image and labels the resulting columns.

use log::debug;
use ndarray::{Array2, Axis};

use crate::confounds::ConfoundMatrix;
use crate::extractor::timeseries::TimeSeriesTable;
use crate::image::errors::{RoiError, RoiResult};
use crate::image::types::FunctionalImage;
use crate::masker::{Masker, MaskerKind};

/// Label used for the averaged binary region when none is given
pub const DEFAULT_ROI_LABEL: &str = "roi";

/// Prefix of voxel column labels
pub const VOXEL_PREFIX: &str = "voxel";

/// Reject option combinations the masker cannot serve
///
/// Voxel output is only defined for binary masks.
pub fn check_output_mode(masker: &Masker, as_voxels: bool) -> RoiResult<()> {
    if as_voxels && masker.kind() == MaskerKind::Labels {
        return Err(RoiError::UnsupportedConfiguration(format!(
            "voxel output requires a binary mask, but the mask has {} labels",
            masker.n_regions()
        )));
    }
    Ok(())
}

/// Extract a labeled time series table from one image
///
/// # Arguments
/// * `masker` - Masker built from the batch mask
/// * `image` - Functional image, already trimmed
/// * `confounds` - Optional confounds aligned with the image frames
/// * `roi_labels` - Optional column labels overriding the defaults
/// * `as_voxels` - Keep individual voxels instead of the region mean
///
/// # Returns
/// A binary mask gives one `roi` column (or `voxel0..voxelN` with
/// `as_voxels`); an atlas gives one column per label in ascending order.
pub fn mask(
    masker: &Masker,
    image: &FunctionalImage,
    confounds: Option<&ConfoundMatrix>,
    roi_labels: Option<&[String]>,
    as_voxels: bool,
) -> RoiResult<TimeSeriesTable> {
    check_output_mode(masker, as_voxels)?;

    let timeseries = masker.fit_transform(image, confounds.map(|c| &c.values))?;

    let (values, labels): (Array2<f64>, Vec<String>) = match masker {
        Masker::Binary { .. } if as_voxels => {
            let labels = (0..timeseries.ncols())
                .map(|i| format!("{}{}", VOXEL_PREFIX, i))
                .collect();
            (timeseries, labels)
        }
        Masker::Binary { .. } => {
            let mean = timeseries.mean_axis(Axis(1))
                .ok_or_else(|| RoiError::Shape("binary mask has no voxels".to_string()))?
                .insert_axis(Axis(1));
            let labels = match roi_labels {
                Some(labels) => labels.to_vec(),
                None => vec![DEFAULT_ROI_LABEL.to_string()],
            };
            (mean, labels)
        }
        Masker::Labels { .. } => {
            let labels = match roi_labels {
                Some(labels) => labels.to_vec(),
                None => masker.labels()
                    .unwrap_or_default()
                    .iter()
                    .map(|l| l.to_string())
                    .collect(),
            };
            (timeseries, labels)
        }
    };
    debug!("Output columns: {:?}", labels);

    TimeSeriesTable::new(labels, values)
}
