//! Confound regressor construction
//!
//! Reads a tab-separated confound file, keeps the requested columns and
//! optionally appends temporal derivatives of the realignment (motion)
//! parameters.

use lazy_static::lazy_static;
use log::{debug, info};
use ndarray::{s, Array1, Array2, ArrayView1};
use regex::Regex;
use std::path::Path;

use crate::confounds::table::ConfoundMatrix;
use crate::image::errors::{RoiError, RoiResult};

lazy_static! {
    // Realignment parameters carry rotation or translation in their name
    static ref REALIGN_COLUMN: Regex = Regex::new("rot|trans").expect("valid realignment pattern");
}

/// Cell values read as missing
const MISSING_VALUES: [&str; 5] = ["", "n/a", "NaN", "nan", "NA"];

/// Suffix appended to derivative column names
pub const DERIVATIVE_SUFFIX: &str = "_d";

/// Whether a column holds a realignment parameter
pub fn is_realignment_column(name: &str) -> bool {
    REALIGN_COLUMN.is_match(name)
}

/// Build the confound matrix for one run
///
/// # Arguments
/// * `path` - Tab-separated confound file with a header row
/// * `names` - Columns to keep, in output order
/// * `realign_derivs` - Append derivatives of the selected realignment columns
/// * `t_r` - Sample spacing in seconds, required with `realign_derivs`
///
/// # Returns
/// The selected columns followed by any derivative columns
pub fn build_regressors(
    path: &Path,
    names: &[String],
    realign_derivs: bool,
    t_r: Option<f64>,
) -> RoiResult<ConfoundMatrix> {
    if realign_derivs && t_r.is_none() {
        return Err(RoiError::Configuration(
            "t_r not provided for realignment derivatives".to_string(),
        ));
    }
    if names.is_empty() {
        return Err(RoiError::Configuration(format!(
            "no regressor names given for confound file {}", path.display()
        )));
    }

    info!("Building regressors from {}", path.display());
    let selected = read_columns(path, names)?;

    match t_r {
        Some(t_r) if realign_derivs => compute_realign_derivs(selected, t_r),
        _ => Ok(selected),
    }
}

/// Append `<name>_d` derivative columns for every realignment column
///
/// Derivatives are central differences at spacing `t_r` with one-sided
/// differences at both ends.
pub fn compute_realign_derivs(regressors: ConfoundMatrix, t_r: f64) -> RoiResult<ConfoundMatrix> {
    if t_r.is_nan() || t_r <= 0.0 {
        return Err(RoiError::Configuration(format!("t_r must be positive, got {}", t_r)));
    }

    let realign: Vec<usize> = regressors.names.iter()
        .enumerate()
        .filter(|(_, n)| is_realignment_column(n))
        .map(|(i, _)| i)
        .collect();

    if realign.is_empty() {
        debug!("No realignment columns among {:?}", regressors.names);
        return Ok(regressors);
    }

    let n_rows = regressors.n_rows();
    let n_cols = regressors.n_columns() + realign.len();
    let mut values = Array2::<f64>::zeros((n_rows, n_cols));
    values.slice_mut(s![.., ..regressors.n_columns()]).assign(&regressors.values);

    let mut names = regressors.names.clone();
    for (k, &i) in realign.iter().enumerate() {
        let deriv = gradient(regressors.values.column(i), t_r)?;
        values.column_mut(regressors.n_columns() + k).assign(&deriv);
        names.push(format!("{}{}", regressors.names[i], DERIVATIVE_SUFFIX));
    }
    debug!("Added {} derivative columns", realign.len());

    ConfoundMatrix::new(names, values)
}

/// Central-difference gradient with sample spacing `h`
pub fn gradient(x: ArrayView1<'_, f64>, h: f64) -> RoiResult<Array1<f64>> {
    let n = x.len();
    if n < 2 {
        return Err(RoiError::Shape(format!(
            "at least 2 rows are required to compute derivatives, got {}", n
        )));
    }

    let mut out = Array1::<f64>::zeros(n);
    out[0] = (x[1] - x[0]) / h;
    out[n - 1] = (x[n - 1] - x[n - 2]) / h;
    for i in 1..n - 1 {
        out[i] = (x[i + 1] - x[i - 1]) / (2.0 * h);
    }
    Ok(out)
}

fn read_columns(path: &Path, names: &[String]) -> RoiResult<ConfoundMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let file = path.display().to_string();
    let headers = reader.headers()?.clone();
    let indices = names.iter()
        .map(|name| {
            headers.iter()
                .position(|h| h == name)
                .ok_or_else(|| RoiError::ColumnNotFound { column: name.clone(), file: file.clone() })
        })
        .collect::<RoiResult<Vec<usize>>>()?;

    let mut rows: Vec<f64> = Vec::new();
    let mut n_rows = 0;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (&idx, name) in indices.iter().zip(names) {
            let cell = record.get(idx).unwrap_or("");
            rows.push(parse_cell(cell).ok_or_else(|| RoiError::InvalidData(format!(
                "{}: cannot parse '{}' in column '{}' at row {}", file, cell, name, row + 1
            )))?);
        }
        n_rows += 1;
    }
    debug!("Read {} rows x {} columns from {}", n_rows, names.len(), file);

    let values = Array2::from_shape_vec((n_rows, names.len()), rows)?;
    ConfoundMatrix::new(names.to_vec(), values)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if MISSING_VALUES.contains(&cell) {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}
