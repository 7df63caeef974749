//! Path and file name utilities

use std::path::Path;

/// Suffix of every output table
pub const TIMESERIES_SUFFIX: &str = "_timeseries.tsv";

/// Final component of a path as a string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// File name up to the first `.`, so `sub-01.nii.gz` gives `sub-01`
pub fn strip_extensions(path: &Path) -> String {
    let name = file_name(path);
    match name.split('.').next() {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Output table name for an input image
pub fn timeseries_file_name(path: &Path) -> String {
    format!("{}{}", strip_extensions(path), TIMESERIES_SUFFIX)
}

/// Split a comma separated list, dropping empty items
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
