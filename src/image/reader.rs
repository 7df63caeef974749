//! NIfTI image reader
//!
//! Loads functional and label volumes through the `nifti` crate. Both
//! `.nii` and `.nii.gz` are supported; gzip is detected from the file name.

use log::{debug, info, warn};
use ndarray::{Ix3, Ix4, IxDyn, Array, Axis};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::path::Path;

use crate::image::errors::{RoiError, RoiResult};
use crate::image::types::{FunctionalImage, LabelImage};

/// Loads a 4-D functional image
///
/// # Arguments
/// * `path` - Path to a `.nii` or `.nii.gz` file
///
/// # Returns
/// The image with intensities as `f64`, or an error if the file is missing,
/// unreadable or not four-dimensional
pub fn load_functional(path: &Path) -> RoiResult<FunctionalImage> {
    info!("Loading functional image: {}", path.display());
    let (data, header) = read_volume(path)?;

    if data.ndim() != 4 {
        return Err(RoiError::Shape(format!(
            "{} is {}-D; a 4-D (x, y, z, time) image is required",
            path.display(), data.ndim()
        )));
    }

    let data = data.into_dimensionality::<Ix4>()?;
    debug!("Functional image shape: {:?}", data.shape());

    Ok(FunctionalImage {
        data,
        header,
        source: Some(path.to_path_buf()),
    })
}

/// Loads a 3-D mask or atlas image
///
/// A 4-D file with a single volume is accepted and squeezed to 3-D.
pub fn load_labels(path: &Path) -> RoiResult<LabelImage> {
    info!("Loading mask image: {}", path.display());
    let (data, header) = read_volume(path)?;

    let data = match data.ndim() {
        3 => data.into_dimensionality::<Ix3>()?,
        4 if data.len_of(Axis(3)) == 1 => {
            data.index_axis_move(Axis(3), 0).into_dimensionality::<Ix3>()?
        }
        n => {
            return Err(RoiError::Shape(format!(
                "{} is {}-D; a 3-D label image is required",
                path.display(), n
            )))
        }
    };
    debug!("Mask image shape: {:?}", data.shape());

    let labels = LabelImage {
        data,
        header,
        source: Some(path.to_path_buf()),
    };
    let non_integral = labels.count_non_integral();
    if non_integral > 0 {
        warn!("{} voxel(s) of {} are not whole numbers and will be rounded to the nearest label",
              non_integral, path.display());
    }
    Ok(labels)
}

fn read_volume(path: &Path) -> RoiResult<(Array<f64, IxDyn>, nifti::NiftiHeader)> {
    if !path.exists() {
        return Err(RoiError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let data = obj.into_volume().into_ndarray::<f64>()?;
    Ok((data, header))
}
