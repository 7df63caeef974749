//! Leading scan removal
//!
//! Drops the first frames of a run from the image and, in the same call,
//! from its confound matrix so the two stay aligned.

use log::debug;
use ndarray::{s, Axis};

use crate::confounds::ConfoundMatrix;
use crate::image::errors::{RoiError, RoiResult};
use crate::image::types::{sync_header_dims, FunctionalImage};

/// Remove the first `n_scans` frames from an image and its confounds
///
/// # Arguments
/// * `image` - Functional image to trim
/// * `n_scans` - Number of leading frames to discard
/// * `confounds` - Optional confound matrix aligned with the image frames
///
/// # Returns
/// The trimmed image and confounds. An `n_scans` larger than the frames
/// available in either input is a `Dimension` error.
pub fn discard_initial_scans(
    image: FunctionalImage,
    n_scans: usize,
    confounds: Option<ConfoundMatrix>,
) -> RoiResult<(FunctionalImage, Option<ConfoundMatrix>)> {
    if n_scans == 0 {
        return Ok((image, confounds));
    }

    let n_frames = image.n_frames();
    if n_scans > n_frames {
        return Err(RoiError::Dimension(format!(
            "cannot discard {} scans from {} with {} frames",
            n_scans, image.name(), n_frames
        )));
    }

    let FunctionalImage { data, mut header, source } = image;
    let data = data.slice_move(s![.., .., .., n_scans..]);
    sync_header_dims(&mut header, data.shape());
    debug!("Discarded {} scans, {} frames remain", n_scans, data.len_of(Axis(3)));

    let confounds = match confounds {
        Some(c) => Some(c.drop_leading_rows(n_scans)?),
        None => None,
    };

    Ok((FunctionalImage { data, header, source }, confounds))
}
