//! End-to-end tests for time series extraction

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array3, Array4};
use nifti::writer::WriterOptions;
use tempfile::tempdir;

use roikit::utils::config_utils::Parameters;
use roikit::{ExtractionSettings, MaskSource, MaskerConfig, RoiError, RoiKit};

/// Atlas on a 4x3x2 grid: label = x, slab 0 is background
fn write_atlas(path: &Path) {
    let atlas = Array3::from_shape_fn((4, 3, 2), |(x, _, _)| x as f64);
    WriterOptions::new(path).write_nifti(&atlas).unwrap();
}

fn write_run(path: &Path, n_frames: usize, seed: f64) {
    let data = Array4::from_shape_fn((4, 3, 2, n_frames), |(x, y, z, t)| {
        let t = t as f64;
        100.0 * x as f64 + (seed * (t + 1.0) + y as f64).sin() + 0.1 * z as f64 * t
    });
    WriterOptions::new(path).write_nifti(&data).unwrap();
}

fn write_confounds(path: &Path, n_rows: usize) {
    let mut contents = String::from("rot_x\ttrans_z\tcsf\tframewise_displacement\n");
    for t in 0..n_rows {
        let t = t as f64;
        contents.push_str(&format!(
            "{:.4}\t{:.4}\t{:.4}\tn/a\n", (0.3 * t).cos(), 0.01 * t * t, (1.7 * t).sin()
        ));
    }
    fs::write(path, contents).unwrap();
}

fn setup(dir: &Path, n_frames: usize) -> (Vec<PathBuf>, Vec<PathBuf>, PathBuf) {
    let atlas = dir.join("atlas.nii.gz");
    write_atlas(&atlas);

    let mut inputs = Vec::new();
    let mut confounds = Vec::new();
    for (i, seed) in [0.7, 1.3, 2.1].iter().enumerate() {
        let img = dir.join(format!("sub-0{}_bold.nii.gz", i + 1));
        let conf = dir.join(format!("sub-0{}_confounds.tsv", i + 1));
        write_run(&img, n_frames, *seed);
        write_confounds(&conf, n_frames);
        inputs.push(img);
        confounds.push(conf);
    }
    (inputs, confounds, atlas)
}

fn settings() -> ExtractionSettings {
    ExtractionSettings {
        regressor_names: Some(vec!["rot_x".to_string(), "trans_z".to_string(), "csf".to_string()]),
        realign_derivs: true,
        discard_scans: Some(2),
        ..ExtractionSettings::default()
    }
}

#[test]
fn test_atlas_batch_with_confounds() {
    let dir = tempdir().unwrap();
    let (inputs, confounds, atlas) = setup(dir.path(), 12);
    let out_dir = dir.path().join("timeseries");

    let api = RoiKit::new()
        .with_masker_config(MaskerConfig::new().with_t_r(2.0).with_standardize(true));
    let outputs = api.make_timeseries(
        &inputs, MaskSource::Path(atlas), &out_dir, Some(&confounds), &settings(),
    ).unwrap();

    assert_eq!(outputs.len(), 3);
    for (i, out) in outputs.iter().enumerate() {
        assert_eq!(out, &out_dir.join(format!("sub-0{}_bold_timeseries.tsv", i + 1)));

        let contents = fs::read_to_string(out).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "1\t2\t3");
        assert_eq!(lines.len(), 1 + 10);
        for line in &lines[1..] {
            let cells: Vec<&str> = line.split('\t').collect();
            assert_eq!(cells.len(), 3);
            for cell in cells {
                let decimals = cell.split('.').nth(1).unwrap();
                assert_eq!(decimals.len(), 8);
                assert!(cell.parse::<f64>().unwrap().is_finite());
            }
        }
    }
}

#[test]
fn test_parallel_output_identical_to_sequential() {
    let dir = tempdir().unwrap();
    let (inputs, confounds, atlas) = setup(dir.path(), 9);
    let config = MaskerConfig::new().with_t_r(1.5).with_detrend(true);

    let seq_dir = dir.path().join("seq");
    let sequential = RoiKit::new()
        .with_masker_config(config)
        .make_timeseries(&inputs, MaskSource::Path(atlas.clone()), &seq_dir, Some(&confounds), &settings())
        .unwrap();

    let par_dir = dir.path().join("par");
    let parallel = RoiKit::new()
        .with_masker_config(config)
        .with_n_jobs(3)
        .make_timeseries(&inputs, MaskSource::Path(atlas), &par_dir, Some(&confounds), &settings())
        .unwrap();

    for (s, p) in sequential.iter().zip(&parallel) {
        assert_eq!(fs::read(s).unwrap(), fs::read(p).unwrap());
    }
}

#[test]
fn test_run_from_parameter_file() {
    let dir = tempdir().unwrap();
    let (inputs, _, atlas) = setup(dir.path(), 6);
    let out_dir = dir.path().join("from_toml");

    let toml = format!(
        "input_files = [\"{}\"]\nmask = \"{}\"\noutput_dir = \"{}\"\nlabels = [\"a\", \"b\", \"c\"]\n\
         discard_scans = 1\n\n[masker]\nt_r = 2\nstandardize = true\n",
        inputs[0].display(), atlas.display(), out_dir.display()
    );
    let params = Parameters::from_str(&toml).unwrap();
    assert_eq!(params.t_r, Some(2.0));
    assert_eq!(params.standardize, Some(true));

    let outputs = RoiKit::new().run(params).unwrap();
    let contents = fs::read_to_string(&outputs[0]).unwrap();
    assert!(contents.starts_with("a\tb\tc\n"));
    assert_eq!(contents.lines().count(), 6);
}

#[test]
fn test_parameter_file_rejects_filtering() {
    let result = Parameters::from_str("mask = \"atlas.nii\"\n\n[masker]\nhigh_pass = 0.01\n");
    assert!(matches!(result, Err(RoiError::UnsupportedConfiguration(_))));

    let result = Parameters::from_str("smoothing_fwhm = 6\n");
    assert!(matches!(result, Err(RoiError::UnsupportedConfiguration(_))));
}

#[test]
fn test_parameter_file_types_and_merge() {
    let file = Parameters::from_str(
        "input_files = \"run.nii\"\nregressor_names = [\"csf\"]\nn_jobs = 4\nunknown = 1\n",
    ).unwrap();
    assert_eq!(file.input_files, Some(vec!["run.nii".to_string()]));
    assert_eq!(file.n_jobs, Some(4));

    let cli = Parameters { n_jobs: Some(2), mask: Some("mask.nii".to_string()), ..Parameters::default() };
    let merged = file.merge(cli);
    assert_eq!(merged.n_jobs, Some(2));
    assert_eq!(merged.mask, Some("mask.nii".to_string()));
    assert_eq!(merged.regressor_names, Some(vec!["csf".to_string()]));

    assert!(matches!(Parameters::from_str("n_jobs = \"two\"\n"), Err(RoiError::Configuration(_))));
    assert!(matches!(Parameters::from_str("discard_scans = -1\n"), Err(RoiError::Configuration(_))));
}

#[test]
fn test_run_requires_inputs_and_mask() {
    let params = Parameters { mask: Some("mask.nii".to_string()), ..Parameters::default() };
    assert!(matches!(RoiKit::new().run(params), Err(RoiError::Configuration(_))));

    let params = Parameters { input_files: Some(vec!["a.nii".to_string()]), ..Parameters::default() };
    assert!(matches!(RoiKit::new().run(params), Err(RoiError::Configuration(_))));
}

#[test]
fn test_inspect_reports_regions_and_grid() {
    let dir = tempdir().unwrap();
    let (inputs, _, atlas) = setup(dir.path(), 4);

    let summary = RoiKit::new().inspect(&atlas, &inputs[..1]).unwrap();
    assert!(summary.contains("Masker: labels"));
    assert!(summary.contains("Regions: 3"));
    assert!(summary.contains("Labels: 1, 2, 3"));
    assert!(summary.contains("Matches mask grid: yes"));
}

#[test]
fn test_binary_mask_voxel_output() {
    let dir = tempdir().unwrap();
    let (inputs, _, _) = setup(dir.path(), 5);
    let mask = dir.path().join("mask.nii");
    let data = Array3::from_shape_fn((4, 3, 2), |(x, y, _)| if x == 2 && y < 2 { 1.0 } else { 0.0 });
    WriterOptions::new(&mask).write_nifti(&data).unwrap();

    let settings = ExtractionSettings { as_voxels: true, ..ExtractionSettings::default() };
    let outputs = RoiKit::new()
        .make_timeseries(&inputs[..1], MaskSource::Path(mask), dir.path(), None, &settings)
        .unwrap();

    let contents = fs::read_to_string(&outputs[0]).unwrap();
    assert_eq!(contents.lines().next(), Some("voxel0\tvoxel1\tvoxel2\tvoxel3"));
    assert_eq!(contents.lines().count(), 6);
}

#[test]
fn test_logger_writes_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roikit.log");
    let logger = roikit::utils::logger::Logger::new(path.to_str().unwrap())
        .unwrap()
        .with_console(false);

    logger.log("[INFO] extracting").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[INFO] extracting\n");
}
