//! Signal cleaning
//!
//! Operates column-wise on frames × signals matrices: optional linear
//! detrending, confound regression by orthogonal projection and optional
//! z-scoring, in that order.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Axis};

use crate::image::errors::{RoiError, RoiResult};
use crate::masker::config::MaskerConfig;

/// Columns whose norm drops below this fraction of their original norm
/// during orthogonalisation are treated as linearly dependent
const RANK_TOLERANCE: f64 = 1e-10;

/// Standard deviations below this are treated as constant signals
const STD_EPSILON: f64 = f64::EPSILON;

/// Clean a frames × signals matrix
///
/// # Arguments
/// * `signals` - One column per signal, one row per frame
/// * `confounds` - Optional frames × regressors matrix to project out
/// * `config` - Detrend and standardize options
///
/// # Returns
/// The cleaned matrix, or a `Shape` error if the confound rows do not match
/// the frame count, or `InvalidData` if a confound is not finite
pub fn clean(
    mut signals: Array2<f64>,
    confounds: Option<&Array2<f64>>,
    config: &MaskerConfig,
) -> RoiResult<Array2<f64>> {
    let n_frames = signals.nrows();

    if config.detrend {
        for column in signals.columns_mut() {
            detrend(column);
        }
    }

    if let Some(confounds) = confounds {
        if confounds.nrows() != n_frames {
            return Err(RoiError::Shape(format!(
                "confounds have {} rows but the image has {} frames",
                confounds.nrows(), n_frames
            )));
        }
        if confounds.iter().any(|v| !v.is_finite()) {
            return Err(RoiError::InvalidData(
                "confounds contain missing or non-finite values".to_string(),
            ));
        }

        let mut design = confounds.to_owned();
        if config.detrend {
            for column in design.columns_mut() {
                detrend(column);
            }
        }
        let basis = orthonormal_basis(design);
        debug!("Regressing out {} confound direction(s)", basis.len());

        for mut column in signals.columns_mut() {
            for q in &basis {
                let coef = q.dot(&column);
                column.scaled_add(-coef, q);
            }
        }
    }

    if config.standardize {
        for column in signals.columns_mut() {
            standardize(column);
        }
    }

    Ok(signals)
}

/// Remove the least-squares line (and therefore the mean) from a signal
pub fn detrend(mut y: ArrayViewMut1<'_, f64>) {
    let n = y.len();
    if n == 0 {
        return;
    }
    let mean = y.sum() / n as f64;
    if n == 1 {
        y -= mean;
        return;
    }

    let t_mean = (n - 1) as f64 / 2.0;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, v) in y.iter().enumerate() {
        let dt = i as f64 - t_mean;
        sxy += dt * (v - mean);
        sxx += dt * dt;
    }
    let slope = sxy / sxx;
    for (i, v) in y.iter_mut().enumerate() {
        *v -= mean + slope * (i as f64 - t_mean);
    }
}

/// Z-score a signal using the population standard deviation
///
/// Constant signals are centred only.
pub fn standardize(mut y: ArrayViewMut1<'_, f64>) {
    let n = y.len();
    if n == 0 {
        return;
    }
    let mean = y.sum() / n as f64;
    y -= mean;
    let std = (y.iter().map(|v| v * v).sum::<f64>() / n as f64).sqrt();
    if std > STD_EPSILON {
        y /= std;
    }
}

/// Orthonormal basis of the centred column space of `design`
///
/// Modified Gram-Schmidt; dependent and constant columns are dropped.
fn orthonormal_basis(mut design: Array2<f64>) -> Vec<Array1<f64>> {
    for mut column in design.columns_mut() {
        let n = column.len().max(1) as f64;
        let mean = column.sum() / n;
        column -= mean;
    }

    let mut basis: Vec<Array1<f64>> = Vec::with_capacity(design.len_of(Axis(1)));
    for column in design.columns() {
        let original = norm(column);
        if original <= STD_EPSILON {
            continue;
        }
        let mut v = column.to_owned();
        for q in &basis {
            let coef = q.dot(&v);
            v.scaled_add(-coef, q);
        }
        let remaining = norm(v.view());
        if remaining > RANK_TOLERANCE * original {
            v /= remaining;
            basis.push(v);
        }
    }
    basis
}

fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}
