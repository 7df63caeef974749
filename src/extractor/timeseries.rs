//! Time series output table
//!
//! A labeled frames × columns matrix and its tab-separated serialization.

use log::info;
use ndarray::Array2;
use std::path::Path;

use crate::image::errors::{RoiError, RoiResult};

/// Decimal places written for every value
pub const FLOAT_PRECISION: usize = 8;

/// Extracted time series with one labeled column per region or voxel
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable {
    /// Column labels
    pub columns: Vec<String>,
    /// Values, one row per frame
    pub values: Array2<f64>,
}

impl TimeSeriesTable {
    /// Create a table, checking that labels match the column count
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> RoiResult<Self> {
        if columns.len() != values.ncols() {
            return Err(RoiError::Shape(format!(
                "{} labels given for {} columns", columns.len(), values.ncols()
            )));
        }
        Ok(TimeSeriesTable { columns, values })
    }

    /// Number of frames
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Write the table as TSV: header row, fixed-precision values, no index
    ///
    /// Missing (NaN) values are written as empty cells.
    pub fn save_tsv(&self, path: &Path) -> RoiResult<()> {
        info!("Writing {} x {} time series to {}", self.n_rows(), self.n_columns(), path.display());

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)?;

        writer.write_record(&self.columns)?;
        for row in self.values.rows() {
            writer.write_record(row.iter().map(|&v| format_value(v)))?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Format one value the way it appears in the output file
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:.*}", FLOAT_PRECISION, value)
    }
}
