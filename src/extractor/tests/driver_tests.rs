use std::fs;
use tempfile::tempdir;

use crate::extractor::{mask_and_save, ExtractionSettings};
use crate::image::errors::RoiError;
use crate::image::tests::test_utils::{binary_mask, ramp_image, slab_atlas, write_functional};
use crate::masker::{Masker, MaskerConfig};

fn confound_file(n_rows: usize) -> String {
    let mut contents = String::from("trans_x\tcsf\n");
    for t in 0..n_rows {
        contents.push_str(&format!("{}\t{}\n", (t * t) as f64 * 0.1, (t % 3) as f64));
    }
    contents
}

#[test]
fn test_output_named_after_input_basename() {
    let dir = tempdir().unwrap();
    let img_path = dir.path().join("sub-01_task-rest_bold.nii.gz");
    write_functional(&img_path, &ramp_image((4, 2, 2), 6));

    let masker = Masker::from_atlas(&slab_atlas(), MaskerConfig::new());
    let out = mask_and_save(&masker, &img_path, dir.path(), &ExtractionSettings::default(), None).unwrap();

    assert_eq!(out, dir.path().join("sub-01_task-rest_bold_timeseries.tsv"));
    let contents = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "1\t2\t3");
    assert_eq!(lines[1], "105.50000000\t205.50000000\t305.50000000");
}

#[test]
fn test_discard_trims_image_and_confounds() {
    let dir = tempdir().unwrap();
    let img_path = dir.path().join("run1.nii");
    let conf_path = dir.path().join("run1_confounds.tsv");
    write_functional(&img_path, &ramp_image((4, 2, 2), 10));
    fs::write(&conf_path, confound_file(10)).unwrap();

    let settings = ExtractionSettings {
        regressor_names: Some(vec!["trans_x".to_string(), "csf".to_string()]),
        realign_derivs: true,
        discard_scans: Some(3),
        ..ExtractionSettings::default()
    };
    let masker = Masker::binary(&binary_mask(4), MaskerConfig::new().with_t_r(2.0));
    let out = mask_and_save(&masker, &img_path, dir.path(), &settings, Some(&conf_path)).unwrap();

    let contents = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "roi");
    assert_eq!(lines.len(), 8);
}

#[test]
fn test_discard_beyond_frames_is_dimension_error() {
    let dir = tempdir().unwrap();
    let img_path = dir.path().join("short.nii");
    write_functional(&img_path, &ramp_image((4, 2, 2), 3));

    let settings = ExtractionSettings { discard_scans: Some(4), ..ExtractionSettings::default() };
    let masker = Masker::from_atlas(&slab_atlas(), MaskerConfig::new());
    let result = mask_and_save(&masker, &img_path, dir.path(), &settings, None);
    assert!(matches!(result, Err(RoiError::Dimension(_))));
}

#[test]
fn test_confound_length_must_match_image() {
    let dir = tempdir().unwrap();
    let img_path = dir.path().join("run2.nii");
    let conf_path = dir.path().join("run2_confounds.tsv");
    write_functional(&img_path, &ramp_image((4, 2, 2), 6));
    fs::write(&conf_path, confound_file(5)).unwrap();

    let settings = ExtractionSettings {
        regressor_names: Some(vec!["csf".to_string()]),
        ..ExtractionSettings::default()
    };
    let masker = Masker::from_atlas(&slab_atlas(), MaskerConfig::new());
    let result = mask_and_save(&masker, &img_path, dir.path(), &settings, Some(&conf_path));
    assert!(matches!(result, Err(RoiError::Shape(_))));
}

#[test]
fn test_missing_confound_column_fails() {
    let dir = tempdir().unwrap();
    let img_path = dir.path().join("run3.nii");
    let conf_path = dir.path().join("run3_confounds.tsv");
    write_functional(&img_path, &ramp_image((4, 2, 2), 4));
    fs::write(&conf_path, confound_file(4)).unwrap();

    let settings = ExtractionSettings {
        regressor_names: Some(vec!["white_matter".to_string()]),
        ..ExtractionSettings::default()
    };
    let masker = Masker::from_atlas(&slab_atlas(), MaskerConfig::new());
    let result = mask_and_save(&masker, &img_path, dir.path(), &settings, Some(&conf_path));
    assert!(matches!(result, Err(RoiError::ColumnNotFound { .. })));
    assert!(!dir.path().join("run3_timeseries.tsv").exists());
}
