//! Batch orchestration
//!
//! Builds the masker once and runs the per-image driver for every input,
//! either in order on the calling thread or on a worker pool owned by the
//! call.

use log::{debug, error, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractor::driver::{mask_and_save, ExtractionSettings};
use crate::extractor::mask_step::check_output_mode;
use crate::image::errors::{RoiError, RoiResult};
use crate::image::{load_labels, LabelImage};
use crate::masker::{set_masker, Masker, MaskerConfig};
use crate::utils::progress::ProgressTracker;

/// Where the batch mask comes from
#[derive(Debug, Clone)]
pub enum MaskSource {
    /// A NIfTI file on disk
    Path(PathBuf),
    /// An image already in memory
    Image(LabelImage),
}

impl MaskSource {
    /// Load the mask image
    pub fn load(&self) -> RoiResult<LabelImage> {
        match self {
            MaskSource::Path(path) => load_labels(path),
            MaskSource::Image(image) => Ok(image.clone()),
        }
    }
}

/// Everything needed to extract time series from a set of images
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Functional images to process
    pub input_files: Vec<PathBuf>,
    /// Mask or atlas shared by all images
    pub mask: MaskSource,
    /// Directory receiving one table per image
    pub output_dir: PathBuf,
    /// One confound file per input image, in the same order
    pub regressor_files: Option<Vec<PathBuf>>,
    /// Settings shared by all images
    pub settings: ExtractionSettings,
    /// Masker cleaning options; `t_r` also drives realignment derivatives
    pub masker_config: MaskerConfig,
    /// Number of workers; 1 runs sequentially
    pub n_jobs: usize,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl BatchRequest {
    /// A sequential request with default settings
    pub fn new(input_files: Vec<PathBuf>, mask: MaskSource, output_dir: impl Into<PathBuf>) -> Self {
        BatchRequest {
            input_files,
            mask,
            output_dir: output_dir.into(),
            regressor_files: None,
            settings: ExtractionSettings::default(),
            masker_config: MaskerConfig::default(),
            n_jobs: 1,
            show_progress: false,
        }
    }

    /// Check option combinations before any image is touched
    pub fn validate(&self) -> RoiResult<()> {
        if self.n_jobs == 0 {
            return Err(RoiError::Configuration("n_jobs must be at least 1".to_string()));
        }
        if let Some(files) = &self.regressor_files {
            if files.len() != self.input_files.len() {
                return Err(RoiError::Configuration(format!(
                    "{} regressor files given for {} input images",
                    files.len(), self.input_files.len()
                )));
            }
            if self.settings.regressor_names.as_ref().map_or(true, |n| n.is_empty()) {
                return Err(RoiError::Configuration(
                    "regressor files given without regressor names".to_string(),
                ));
            }
        }
        if self.settings.realign_derivs && self.masker_config.t_r.is_none() {
            return Err(RoiError::Configuration(
                "t_r not provided for realignment derivatives".to_string(),
            ));
        }
        self.masker_config.validate()
    }
}

/// Extract time series from every input image
///
/// # Returns
/// Output table paths in input order. A sequential batch stops at the
/// first failing image; a parallel batch finishes every dispatched image
/// and returns the first failure in input order.
pub fn make_timeseries(request: &BatchRequest) -> RoiResult<Vec<PathBuf>> {
    request.validate()?;

    let mask_img = request.mask.load()?;
    let masker = set_masker(&mask_img, request.masker_config)?;
    check_output_mode(&masker, request.settings.as_voxels)?;

    fs::create_dir_all(&request.output_dir)?;

    // Absence of confounds is broadcast to every image
    let regressors: Vec<Option<&Path>> = match &request.regressor_files {
        Some(files) => files.iter().map(|f| Some(f.as_path())).collect(),
        None => vec![None; request.input_files.len()],
    };
    let jobs: Vec<(&Path, Option<&Path>)> = request.input_files.iter()
        .map(|p| p.as_path())
        .zip(regressors)
        .collect();

    let progress = if request.show_progress {
        ProgressTracker::new(jobs.len() as u64, "Extracting time series")
    } else {
        ProgressTracker::hidden()
    };

    info!("Extracting time series from {} image(s) with {} job(s)", jobs.len(), request.n_jobs);
    let result = if request.n_jobs == 1 {
        run_sequential(&masker, &jobs, request, &progress)
    } else {
        run_parallel(&masker, &jobs, request, &progress)
    };

    match &result {
        Ok(paths) => {
            progress.finish();
            info!("Wrote {} time series table(s) to {}", paths.len(), request.output_dir.display());
        }
        Err(e) => {
            progress.abandon("Failed");
            error!("Time series extraction failed: {}", e);
        }
    }
    result
}

fn run_sequential(
    masker: &Masker,
    jobs: &[(&Path, Option<&Path>)],
    request: &BatchRequest,
    progress: &ProgressTracker,
) -> RoiResult<Vec<PathBuf>> {
    let mut outputs = Vec::with_capacity(jobs.len());
    for &(img, regressor_file) in jobs {
        let out = mask_and_save(masker, img, &request.output_dir, &request.settings, regressor_file)?;
        progress.increment(1);
        outputs.push(out);
    }
    Ok(outputs)
}

fn run_parallel(
    masker: &Masker,
    jobs: &[(&Path, Option<&Path>)],
    request: &BatchRequest,
    progress: &ProgressTracker,
) -> RoiResult<Vec<PathBuf>> {
    // Pool lives for this batch only and is joined when dropped
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.n_jobs)
        .thread_name(|i| format!("roikit-worker-{}", i))
        .build()
        .map_err(|e| RoiError::Configuration(format!("Failed to create worker pool: {}", e)))?;
    debug!("Started worker pool with {} threads", pool.current_num_threads());

    let results: Vec<RoiResult<PathBuf>> = pool.install(|| {
        jobs.par_iter()
            .map(|&(img, regressor_file)| {
                let out = mask_and_save(masker, img, &request.output_dir, &request.settings, regressor_file);
                if let Err(e) = &out {
                    error!("Extraction from {} failed: {}", img.display(), e);
                }
                progress.increment(1);
                out
            })
            .collect()
    });

    results.into_iter().collect()
}
