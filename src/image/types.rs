//! Core image data structures

use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{Array3, Array4, Axis};
use nifti::NiftiHeader;

/// A 4-D functional volume indexed `(x, y, z, t)`
///
/// The header is kept as spatial metadata so that trimmed copies keep the
/// original affine and voxel sizes.
#[derive(Debug, Clone)]
pub struct FunctionalImage {
    /// Voxel intensities, scaled by the header slope/intercept
    pub data: Array4<f64>,
    /// Header of the source file
    pub header: NiftiHeader,
    /// Path the image was loaded from, if any
    pub source: Option<PathBuf>,
}

impl FunctionalImage {
    /// Wrap an in-memory array with a header describing it
    pub fn new(data: Array4<f64>, mut header: NiftiHeader) -> Self {
        sync_header_dims(&mut header, data.shape());
        FunctionalImage { data, header, source: None }
    }

    /// Number of time frames
    pub fn n_frames(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    /// Spatial shape `(x, y, z)`
    pub fn spatial_shape(&self) -> (usize, usize, usize) {
        let s = self.data.shape();
        (s[0], s[1], s[2])
    }

    /// Display name used in log messages
    pub fn name(&self) -> String {
        display_name(self.source.as_deref())
    }
}

/// Distance from a whole number below which a label value counts as integral
const LABEL_TOLERANCE: f64 = 1e-6;

/// A 3-D integer label image, 0 is background
#[derive(Debug, Clone)]
pub struct LabelImage {
    /// Label values stored as floats; non-integral values are rounded
    pub data: Array3<f64>,
    /// Header of the source file
    pub header: NiftiHeader,
    /// Path the image was loaded from, if any
    pub source: Option<PathBuf>,
}

impl LabelImage {
    /// Wrap an in-memory label array
    pub fn new(data: Array3<f64>) -> Self {
        let mut header = NiftiHeader::default();
        sync_header_dims(&mut header, data.shape());
        LabelImage { data, header, source: None }
    }

    /// Spatial shape `(x, y, z)`
    pub fn spatial_shape(&self) -> (usize, usize, usize) {
        let s = self.data.shape();
        (s[0], s[1], s[2])
    }

    /// Label of a voxel value
    pub fn label_of(value: f64) -> i64 {
        value.round() as i64
    }

    /// Number of voxels whose value is not a whole number
    pub fn count_non_integral(&self) -> usize {
        self.data.iter()
            .filter(|&&v| (v - v.round()).abs() > LABEL_TOLERANCE)
            .count()
    }

    /// Distinct non-background labels in ascending order
    pub fn distinct_labels(&self) -> Vec<i64> {
        let mut labels: Vec<i64> = self.data.iter()
            .map(|&v| Self::label_of(v))
            .filter(|&l| l != 0)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Display name used in log messages
    pub fn name(&self) -> String {
        display_name(self.source.as_deref())
    }
}

impl fmt::Display for LabelImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.spatial_shape();
        writeln!(f, "Label image: {}", self.name())?;
        writeln!(f, "  Shape: {}x{}x{}", x, y, z)?;
        write!(f, "  Voxel size: {:.3}x{:.3}x{:.3}",
               self.header.pixdim[1], self.header.pixdim[2], self.header.pixdim[3])
    }
}

impl fmt::Display for FunctionalImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.spatial_shape();
        writeln!(f, "Functional image: {}", self.name())?;
        writeln!(f, "  Shape: {}x{}x{}", x, y, z)?;
        writeln!(f, "  Frames: {}", self.n_frames())?;
        write!(f, "  Repetition time: {}", self.header.pixdim[4])
    }
}

/// Keep `dim` in the header consistent with the array shape
pub(crate) fn sync_header_dims(header: &mut NiftiHeader, shape: &[usize]) {
    header.dim = [1; 8];
    header.dim[0] = shape.len() as u16;
    for (i, &len) in shape.iter().enumerate() {
        header.dim[i + 1] = len as u16;
    }
}

fn display_name(source: Option<&Path>) -> String {
    source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<in-memory image>".to_string())
}
