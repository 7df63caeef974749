//! Tests for the NIfTI reader

use ndarray::Array3;
use tempfile::tempdir;

use crate::image::errors::RoiError;
use crate::image::reader::{load_functional, load_labels};
use crate::image::tests::test_utils::{ramp_image, slab_atlas, write_functional, write_labels};
use crate::image::types::LabelImage;

#[test]
fn test_functional_round_trip_keeps_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub-01_bold.nii");
    let image = ramp_image((3, 2, 2), 5);
    write_functional(&path, &image);

    let loaded = load_functional(&path).unwrap();
    assert_eq!(loaded.data.shape(), &[3, 2, 2, 5]);
    assert_eq!(loaded.data[[2, 1, 0, 4]], 212.0);
    assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
}

#[test]
fn test_functional_gzip_is_supported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub-01_bold.nii.gz");
    write_functional(&path, &ramp_image((2, 2, 2), 3));

    let loaded = load_functional(&path).unwrap();
    assert_eq!(loaded.n_frames(), 3);
}

#[test]
fn test_functional_rejects_3d_volume() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("anat.nii");
    write_labels(&path, &slab_atlas());

    let result = load_functional(&path);
    assert!(matches!(result, Err(RoiError::Shape(_))));
}

#[test]
fn test_labels_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("atlas.nii");
    write_labels(&path, &slab_atlas());

    let atlas = load_labels(&path).unwrap();
    assert_eq!(atlas.spatial_shape(), (4, 2, 2));
    assert_eq!(atlas.distinct_labels(), vec![1, 2, 3]);
}

#[test]
fn test_labels_accept_single_volume_4d() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mask4d.nii");
    write_functional(&path, &ramp_image((2, 2, 2), 1));

    let mask = load_labels(&path).unwrap();
    assert_eq!(mask.spatial_shape(), (2, 2, 2));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = load_functional(&dir.path().join("missing.nii"));
    assert!(matches!(result, Err(RoiError::IoError(_))));

    let result = load_labels(&dir.path().join("missing_mask.nii"));
    assert!(matches!(result, Err(RoiError::IoError(_))));
}

#[test]
fn test_written_mask_values_survive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mask.nii");
    let mask = LabelImage::new(Array3::from_shape_fn((2, 2, 2), |(x, y, z)| if x == y && y == z { 1.0 } else { 0.0 }));
    write_labels(&path, &mask);

    let loaded = load_labels(&path).unwrap();
    assert_eq!(loaded.data, mask.data);
}

#[test]
fn test_non_integral_mask_still_loads_rounded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resampled.nii");
    let mask = LabelImage::new(Array3::from_shape_vec((1, 2, 2), vec![0.3, 1.4, 1.6, 0.0]).unwrap());
    write_labels(&path, &mask);

    let loaded = load_labels(&path).unwrap();
    assert_eq!(loaded.count_non_integral(), 3);
    assert_eq!(loaded.distinct_labels(), vec![1, 2]);
}
