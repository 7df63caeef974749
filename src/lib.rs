pub mod image;
pub mod confounds;
pub mod masker;
pub mod extractor;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::RoiKit;

pub use image::{FunctionalImage, LabelImage, RoiError, RoiResult};
pub use confounds::ConfoundMatrix;
pub use masker::{Masker, MaskerConfig, MaskerKind};
pub use extractor::{make_timeseries, BatchRequest, ExtractionSettings, MaskSource, TimeSeriesTable};
