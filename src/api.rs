use std::path::{Path, PathBuf};
use log::info;

use crate::extractor::{make_timeseries, BatchRequest, ExtractionSettings, MaskSource};
use crate::image::errors::{RoiError, RoiResult};
use crate::image::{load_functional, load_labels};
use crate::masker::{set_masker, MaskerConfig};
use crate::utils::config_utils::Parameters;

/// Main interface to the RoiKit library
#[derive(Debug, Clone)]
pub struct RoiKit {
    masker_config: MaskerConfig,
    n_jobs: usize,
    show_progress: bool,
}

impl Default for RoiKit {
    fn default() -> Self {
        RoiKit::new()
    }
}

impl RoiKit {
    /// Create a RoiKit instance running sequentially with cleaning disabled
    pub fn new() -> Self {
        RoiKit {
            masker_config: MaskerConfig::default(),
            n_jobs: 1,
            show_progress: false,
        }
    }

    /// Set the masker cleaning options
    pub fn with_masker_config(mut self, config: MaskerConfig) -> Self {
        self.masker_config = config;
        self
    }

    /// Set the number of parallel workers
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Draw a progress bar while extracting
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Extract time series from input files using a mask or atlas
    ///
    /// # Arguments
    /// * `input_files` - Functional NIfTI images
    /// * `mask` - Binary mask for a single region, or a labeled atlas; 0 is background
    /// * `output_dir` - Directory receiving `<basename>_timeseries.tsv` per image
    /// * `regressor_files` - Optional confound file per image, same order as `input_files`
    /// * `settings` - Confound selection, labels, voxel output and scan discarding
    ///
    /// # Returns
    /// Paths of the written tables, in input order
    pub fn make_timeseries(&self,
                           input_files: &[PathBuf],
                           mask: MaskSource,
                           output_dir: &Path,
                           regressor_files: Option<&[PathBuf]>,
                           settings: &ExtractionSettings) -> RoiResult<Vec<PathBuf>> {
        let request = BatchRequest {
            input_files: input_files.to_vec(),
            mask,
            output_dir: output_dir.to_path_buf(),
            regressor_files: regressor_files.map(|f| f.to_vec()),
            settings: settings.clone(),
            masker_config: self.masker_config,
            n_jobs: self.n_jobs,
            show_progress: self.show_progress,
        };
        make_timeseries(&request)
    }

    /// Run a batch described by a parameter set
    pub fn run(&self, params: Parameters) -> RoiResult<Vec<PathBuf>> {
        let request = self.request_from_parameters(params)?;
        make_timeseries(&request)
    }

    /// Build a batch request from a parameter set
    ///
    /// Masker options and the job count in `params` take precedence over
    /// this instance's settings.
    pub fn request_from_parameters(&self, params: Parameters) -> RoiResult<BatchRequest> {
        let input_files: Vec<PathBuf> = params.input_files
            .filter(|f| !f.is_empty())
            .ok_or_else(|| RoiError::Configuration("no input files given".to_string()))?
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let mask = params.mask
            .ok_or_else(|| RoiError::Configuration("no mask image given".to_string()))?;

        let mut masker_config = self.masker_config;
        if let Some(t_r) = params.t_r {
            masker_config.t_r = Some(t_r);
        }
        if let Some(standardize) = params.standardize {
            masker_config.standardize = standardize;
        }
        if let Some(detrend) = params.detrend {
            masker_config.detrend = detrend;
        }

        Ok(BatchRequest {
            input_files,
            mask: MaskSource::Path(PathBuf::from(mask)),
            output_dir: PathBuf::from(params.output_dir.unwrap_or_else(|| ".".to_string())),
            regressor_files: params.regressor_files
                .map(|files| files.into_iter().map(PathBuf::from).collect()),
            settings: ExtractionSettings {
                regressor_names: params.regressor_names,
                realign_derivs: params.realign_derivs.unwrap_or(false),
                as_voxels: params.as_voxels.unwrap_or(false),
                labels: params.labels,
                discard_scans: params.discard_scans,
            },
            masker_config,
            n_jobs: params.n_jobs.unwrap_or(self.n_jobs),
            show_progress: self.show_progress,
        })
    }

    /// Describe a mask and the images it would be applied to
    ///
    /// # Arguments
    /// * `mask_path` - Mask or atlas image
    /// * `input_files` - Functional images to check against the mask grid
    ///
    /// # Returns
    /// A human-readable summary or an error
    pub fn inspect(&self, mask_path: &Path, input_files: &[PathBuf]) -> RoiResult<String> {
        let mask = load_labels(mask_path)?;
        let masker = set_masker(&mask, self.masker_config)?;

        let mut result = String::from("Mask Inspection Results:\n");
        result.push_str(&format!("{}\n", mask));
        result.push_str(&format!("  Masker: {}\n", masker.kind()));
        result.push_str(&format!("  Regions: {}\n", masker.n_regions()));
        result.push_str(&format!("  Voxels in mask: {}\n", masker.n_voxels()));
        if let Some(labels) = masker.labels() {
            let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
            result.push_str(&format!("  Labels: {}\n", labels.join(", ")));
        }

        for path in input_files {
            info!("Inspecting {}", path.display());
            let image = load_functional(path)?;
            let matches = image.spatial_shape() == mask.spatial_shape();
            result.push_str(&format!("\n{}\n", image));
            result.push_str(&format!("  Matches mask grid: {}\n", if matches { "yes" } else { "no" }));
        }

        Ok(result)
    }
}
