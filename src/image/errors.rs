//! Custom error types for time series extraction

use std::fmt;
use std::io;

/// Errors raised while loading images, building confounds or extracting signals
#[derive(Debug)]
pub enum RoiError {
    /// I/O error
    IoError(io::Error),
    /// NIfTI decoding error
    NiftiError(String),
    /// Invalid or incomplete configuration
    Configuration(String),
    /// Requested confound column is not in the file header
    ColumnNotFound { column: String, file: String },
    /// Mask image has no non-background voxel
    NoRegionDetected(String),
    /// Mismatched array shapes (frames, spatial grid, labels)
    Shape(String),
    /// Out of range index along an axis
    Dimension(String),
    /// Configuration that the extraction engine cannot honour
    UnsupportedConfiguration(String),
    /// Unparseable or non-finite input values
    InvalidData(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoiError::IoError(e) => write!(f, "I/O error: {}", e),
            RoiError::NiftiError(msg) => write!(f, "NIfTI error: {}", msg),
            RoiError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            RoiError::ColumnNotFound { column, file } => {
                write!(f, "Column '{}' not found in {}", column, file)
            }
            RoiError::NoRegionDetected(src) => write!(f, "No ROI detected; check ROI file {}", src),
            RoiError::Shape(msg) => write!(f, "Shape mismatch: {}", msg),
            RoiError::Dimension(msg) => write!(f, "Dimension error: {}", msg),
            RoiError::UnsupportedConfiguration(msg) => write!(f, "Unsupported configuration: {}", msg),
            RoiError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            RoiError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for RoiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoiError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RoiError {
    fn from(error: io::Error) -> Self {
        RoiError::IoError(error)
    }
}

impl From<nifti::NiftiError> for RoiError {
    fn from(error: nifti::NiftiError) -> Self {
        RoiError::NiftiError(error.to_string())
    }
}

impl From<csv::Error> for RoiError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            match error.into_kind() {
                csv::ErrorKind::Io(e) => RoiError::IoError(e),
                other => RoiError::InvalidData(format!("{:?}", other)),
            }
        } else {
            RoiError::InvalidData(error.to_string())
        }
    }
}

impl From<ndarray::ShapeError> for RoiError {
    fn from(error: ndarray::ShapeError) -> Self {
        RoiError::Shape(error.to_string())
    }
}

impl From<String> for RoiError {
    fn from(msg: String) -> Self {
        RoiError::GenericError(msg)
    }
}

/// Result type for extraction operations
pub type RoiResult<T> = Result<T, RoiError>;
