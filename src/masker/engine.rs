//! Binary and labeled-atlas maskers
//!
//! A masker reduces a 4-D image to a frames × features matrix. The binary
//! masker keeps every voxel inside the mask as a feature; the labels masker
//! averages the voxels of each atlas label into one feature. Both then run
//! the same signal cleaning.

use log::debug;
use ndarray::{Array2, ArrayView4};
use std::fmt;

use crate::image::errors::{RoiError, RoiResult};
use crate::image::types::{FunctionalImage, LabelImage};
use crate::masker::config::MaskerConfig;
use crate::masker::signal;

type Voxel = [usize; 3];

/// The kind of a masker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskerKind {
    /// Whole mask treated as one region
    Binary,
    /// One region per atlas label
    Labels,
}

impl fmt::Display for MaskerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskerKind::Binary => write!(f, "binary"),
            MaskerKind::Labels => write!(f, "labels"),
        }
    }
}

/// Voxels carrying one atlas label
#[derive(Debug, Clone)]
pub struct LabelRegion {
    /// Label value in the atlas
    pub label: i64,
    /// Voxel coordinates in row-major order
    pub voxels: Vec<Voxel>,
}

/// A fitted masker
///
/// Built once from a mask image and reused, read-only, for every image of
/// a batch.
#[derive(Debug, Clone)]
pub enum Masker {
    /// Single region; every voxel becomes one output feature
    Binary {
        /// Mask voxels in row-major order
        voxels: Vec<Voxel>,
        /// Spatial shape of the mask
        shape: Voxel,
        /// Cleaning options
        config: MaskerConfig,
    },
    /// Multi-label atlas; one averaged feature per label
    Labels {
        /// Regions in ascending label order
        regions: Vec<LabelRegion>,
        /// Spatial shape of the atlas
        shape: Voxel,
        /// Cleaning options
        config: MaskerConfig,
    },
}

impl Masker {
    /// Binary masker over every non-zero voxel of `mask`
    pub fn binary(mask: &LabelImage, config: MaskerConfig) -> Self {
        let voxels = mask.data.indexed_iter()
            .filter(|(_, v)| LabelImage::label_of(**v) != 0)
            .map(|((x, y, z), _)| [x, y, z])
            .collect();
        let (x, y, z) = mask.spatial_shape();
        Masker::Binary { voxels, shape: [x, y, z], config }
    }

    /// Labels masker with one region per distinct non-zero label
    pub fn from_atlas(atlas: &LabelImage, config: MaskerConfig) -> Self {
        let labels = atlas.distinct_labels();
        let mut regions: Vec<LabelRegion> = labels.iter()
            .map(|&label| LabelRegion { label, voxels: Vec::new() })
            .collect();

        for ((x, y, z), &v) in atlas.data.indexed_iter() {
            let label = LabelImage::label_of(v);
            if label == 0 {
                continue;
            }
            if let Ok(i) = labels.binary_search(&label) {
                regions[i].voxels.push([x, y, z]);
            }
        }

        let (x, y, z) = atlas.spatial_shape();
        Masker::Labels { regions, shape: [x, y, z], config }
    }

    /// Which variant this is
    pub fn kind(&self) -> MaskerKind {
        match self {
            Masker::Binary { .. } => MaskerKind::Binary,
            Masker::Labels { .. } => MaskerKind::Labels,
        }
    }

    /// Cleaning options
    pub fn config(&self) -> &MaskerConfig {
        match self {
            Masker::Binary { config, .. } | Masker::Labels { config, .. } => config,
        }
    }

    /// Number of regions (1 for a binary masker)
    pub fn n_regions(&self) -> usize {
        match self {
            Masker::Binary { .. } => 1,
            Masker::Labels { regions, .. } => regions.len(),
        }
    }

    /// Number of voxels covered by the mask
    pub fn n_voxels(&self) -> usize {
        match self {
            Masker::Binary { voxels, .. } => voxels.len(),
            Masker::Labels { regions, .. } => regions.iter().map(|r| r.voxels.len()).sum(),
        }
    }

    /// Atlas labels in output column order; `None` for a binary masker
    pub fn labels(&self) -> Option<Vec<i64>> {
        match self {
            Masker::Binary { .. } => None,
            Masker::Labels { regions, .. } => Some(regions.iter().map(|r| r.label).collect()),
        }
    }

    /// Extract and clean the signals of one image
    ///
    /// # Arguments
    /// * `image` - Functional image on the same grid as the mask
    /// * `confounds` - Optional frames × regressors matrix
    ///
    /// # Returns
    /// A frames × features matrix: one column per mask voxel (binary) or per
    /// label (labels)
    pub fn fit_transform(&self, image: &FunctionalImage,
                         confounds: Option<&Array2<f64>>) -> RoiResult<Array2<f64>> {
        let (x, y, z) = image.spatial_shape();
        let shape = match self {
            Masker::Binary { shape, .. } | Masker::Labels { shape, .. } => *shape,
        };
        if [x, y, z] != shape {
            return Err(RoiError::Shape(format!(
                "image {} has spatial shape {:?} but the mask has {:?}",
                image.name(), [x, y, z], shape
            )));
        }
        if image.n_frames() == 0 {
            return Err(RoiError::Shape(format!("image {} has no frames", image.name())));
        }

        let data = image.data.view();
        let signals = match self {
            Masker::Binary { voxels, .. } => gather_voxels(data, voxels),
            Masker::Labels { regions, .. } => average_regions(data, regions),
        };
        debug!("Extracted {} frames x {} features with {} masker",
               signals.nrows(), signals.ncols(), self.kind());

        signal::clean(signals, confounds, self.config())
    }
}

fn gather_voxels(data: ArrayView4<'_, f64>, voxels: &[Voxel]) -> Array2<f64> {
    let n_frames = data.shape()[3];
    Array2::from_shape_fn((n_frames, voxels.len()), |(t, v)| {
        let [x, y, z] = voxels[v];
        data[[x, y, z, t]]
    })
}

fn average_regions(data: ArrayView4<'_, f64>, regions: &[LabelRegion]) -> Array2<f64> {
    let n_frames = data.shape()[3];
    Array2::from_shape_fn((n_frames, regions.len()), |(t, r)| {
        let voxels = &regions[r].voxels;
        let sum: f64 = voxels.iter().map(|&[x, y, z]| data[[x, y, z, t]]).sum();
        sum / voxels.len() as f64
    })
}
