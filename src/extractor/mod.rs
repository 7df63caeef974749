//! Time series extraction
//!
//! The extraction step, the per-image driver that writes one table per
//! image, and the batch orchestrator that runs it over many images.

mod batch;
mod driver;
mod mask_step;
mod timeseries;
#[cfg(test)]
mod tests;

pub use batch::{make_timeseries, BatchRequest, MaskSource};
pub use driver::{mask_and_save, ExtractionSettings};
pub use mask_step::{check_output_mode, mask, DEFAULT_ROI_LABEL, VOXEL_PREFIX};
pub use timeseries::{format_value, TimeSeriesTable, FLOAT_PRECISION};
