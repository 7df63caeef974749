//! Parameter file handling
//!
//! Reads extraction parameters from a TOML file. Every value is optional so
//! that command-line arguments can fill in or override what the file
//! leaves out.

use log::warn;
use std::fs;
use std::path::Path;

use crate::image::errors::{RoiError, RoiResult};

/// Keys accepted at the top level of a parameter file
const TOP_LEVEL_KEYS: [&str; 11] = [
    "input_files", "mask", "output_dir", "labels", "regressor_files",
    "regressor_names", "realign_derivs", "as_voxels", "discard_scans",
    "n_jobs", "masker",
];

/// Keys accepted in the `[masker]` table
const MASKER_KEYS: [&str; 3] = ["t_r", "standardize", "detrend"];

/// Options the extraction engine does not implement
const UNSUPPORTED_KEYS: [&str; 3] = ["high_pass", "low_pass", "smoothing_fwhm"];

/// Extraction parameters, each optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    pub input_files: Option<Vec<String>>,
    pub mask: Option<String>,
    pub output_dir: Option<String>,
    pub labels: Option<Vec<String>>,
    pub regressor_files: Option<Vec<String>>,
    pub regressor_names: Option<Vec<String>>,
    pub realign_derivs: Option<bool>,
    pub as_voxels: Option<bool>,
    pub discard_scans: Option<usize>,
    pub n_jobs: Option<usize>,
    pub t_r: Option<f64>,
    pub standardize: Option<bool>,
    pub detrend: Option<bool>,
}

impl Parameters {
    /// Parse parameters from a TOML string
    pub fn from_str(content: &str) -> RoiResult<Self> {
        let value: toml::Value = content.parse()
            .map_err(|e| RoiError::Configuration(format!("Failed to parse TOML: {}", e)))?;
        let table = value.as_table()
            .ok_or_else(|| RoiError::Configuration("parameter file must be a table".to_string()))?;

        check_keys(table, &TOP_LEVEL_KEYS, "")?;

        let mut params = Parameters {
            input_files: string_list(table, "input_files")?,
            mask: string(table, "mask")?,
            output_dir: string(table, "output_dir")?,
            labels: string_list(table, "labels")?,
            regressor_files: string_list(table, "regressor_files")?,
            regressor_names: string_list(table, "regressor_names")?,
            realign_derivs: boolean(table, "realign_derivs")?,
            as_voxels: boolean(table, "as_voxels")?,
            discard_scans: count(table, "discard_scans")?,
            n_jobs: count(table, "n_jobs")?,
            ..Parameters::default()
        };

        if let Some(masker) = table.get("masker") {
            let masker = masker.as_table()
                .ok_or_else(|| RoiError::Configuration("'masker' must be a table".to_string()))?;
            check_keys(masker, &MASKER_KEYS, "masker.")?;
            params.t_r = number(masker, "t_r")?;
            params.standardize = boolean(masker, "standardize")?;
            params.detrend = boolean(masker, "detrend")?;
        }

        Ok(params)
    }

    /// Load parameters from a TOML file
    pub fn from_file(path: &Path) -> RoiResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Values from `overrides` replace ours where present
    pub fn merge(self, overrides: Parameters) -> Parameters {
        Parameters {
            input_files: overrides.input_files.or(self.input_files),
            mask: overrides.mask.or(self.mask),
            output_dir: overrides.output_dir.or(self.output_dir),
            labels: overrides.labels.or(self.labels),
            regressor_files: overrides.regressor_files.or(self.regressor_files),
            regressor_names: overrides.regressor_names.or(self.regressor_names),
            realign_derivs: overrides.realign_derivs.or(self.realign_derivs),
            as_voxels: overrides.as_voxels.or(self.as_voxels),
            discard_scans: overrides.discard_scans.or(self.discard_scans),
            n_jobs: overrides.n_jobs.or(self.n_jobs),
            t_r: overrides.t_r.or(self.t_r),
            standardize: overrides.standardize.or(self.standardize),
            detrend: overrides.detrend.or(self.detrend),
        }
    }
}

fn check_keys(table: &toml::value::Table, known: &[&str], prefix: &str) -> RoiResult<()> {
    for key in table.keys() {
        if UNSUPPORTED_KEYS.contains(&key.as_str()) {
            return Err(RoiError::UnsupportedConfiguration(format!(
                "'{}{}' is not supported; temporal filtering and smoothing are not implemented",
                prefix, key
            )));
        }
        if !known.contains(&key.as_str()) {
            warn!("Ignoring unknown parameter '{}{}'", prefix, key);
        }
    }
    Ok(())
}

fn type_error(key: &str, expected: &str) -> RoiError {
    RoiError::Configuration(format!("'{}' must be {}", key, expected))
}

fn string(table: &toml::value::Table, key: &str) -> RoiResult<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| type_error(key, "a string")),
    }
}

/// A list of strings; a single string is read as a one-element list
fn string_list(table: &toml::value::Table, key: &str) -> RoiResult<Option<Vec<String>>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(vec![s.clone()])),
        Some(toml::Value::Array(items)) => items.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).ok_or_else(|| type_error(key, "a list of strings")))
            .collect::<RoiResult<Vec<String>>>()
            .map(Some),
        Some(_) => Err(type_error(key, "a string or a list of strings")),
    }
}

fn boolean(table: &toml::value::Table, key: &str) -> RoiResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| type_error(key, "a boolean")),
    }
}

fn count(table: &toml::value::Table, key: &str) -> RoiResult<Option<usize>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_integer()
            .filter(|&i| i >= 0)
            .map(|i| Some(i as usize))
            .ok_or_else(|| type_error(key, "a non-negative integer")),
    }
}

fn number(table: &toml::value::Table, key: &str) -> RoiResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Float(f)) => Ok(Some(*f)),
        Some(toml::Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(_) => Err(type_error(key, "a number")),
    }
}
