use ndarray::{Array3, Array4};
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use std::path::Path;

use crate::image::types::{FunctionalImage, LabelImage};

/// Image where voxel (x, y, z) at frame t holds `100x + 10y + z + 0.5t`
pub fn ramp_image(shape: (usize, usize, usize), n_frames: usize) -> FunctionalImage {
    let (sx, sy, sz) = shape;
    let data = Array4::from_shape_fn((sx, sy, sz, n_frames), |(x, y, z, t)| {
        (100 * x + 10 * y + z) as f64 + 0.5 * t as f64
    });
    FunctionalImage::new(data, NiftiHeader::default())
}

/// Atlas of a 4x2x2 grid labeling each x slab with `x` (slab 0 is background)
pub fn slab_atlas() -> LabelImage {
    LabelImage::new(Array3::from_shape_fn((4, 2, 2), |(x, _, _)| x as f64))
}

/// Mask of a 4x2x2 grid with `n` voxels set, filled in row-major order
pub fn binary_mask(n: usize) -> LabelImage {
    let mut count = 0;
    LabelImage::new(Array3::from_shape_fn((4, 2, 2), |_| {
        count += 1;
        if count <= n { 1.0 } else { 0.0 }
    }))
}

pub fn write_functional(path: &Path, image: &FunctionalImage) {
    WriterOptions::new(path)
        .write_nifti(&image.data)
        .unwrap();
}

pub fn write_labels(path: &Path, image: &LabelImage) {
    WriterOptions::new(path)
        .write_nifti(&image.data)
        .unwrap();
}
