//! Confound matrix type

use ndarray::{s, Array2, Axis};

use crate::image::errors::{RoiError, RoiResult};

/// Frames × regressors matrix with named columns
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundMatrix {
    /// Column names in matrix order
    pub names: Vec<String>,
    /// Regressor values, one row per frame
    pub values: Array2<f64>,
}

impl ConfoundMatrix {
    /// Create a confound matrix, checking that names match the column count
    pub fn new(names: Vec<String>, values: Array2<f64>) -> RoiResult<Self> {
        if names.len() != values.ncols() {
            return Err(RoiError::Shape(format!(
                "{} confound names for {} columns", names.len(), values.ncols()
            )));
        }
        Ok(ConfoundMatrix { names, values })
    }

    /// Number of rows (frames)
    pub fn n_rows(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    /// Number of regressors
    pub fn n_columns(&self) -> usize {
        self.values.len_of(Axis(1))
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ndarray::ArrayView1<'_, f64>> {
        self.names.iter()
            .position(|n| n == name)
            .map(|i| self.values.column(i))
    }

    /// Drop the first `n` rows
    pub fn drop_leading_rows(self, n: usize) -> RoiResult<Self> {
        if n > self.n_rows() {
            return Err(RoiError::Dimension(format!(
                "cannot discard {} rows from a confound matrix with {} rows",
                n, self.n_rows()
            )));
        }
        let values = self.values.slice_move(s![n.., ..]);
        Ok(ConfoundMatrix { names: self.names, values })
    }
}
