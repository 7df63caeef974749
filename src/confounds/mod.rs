//! Confound regressors
//!
//! Selection of nuisance regressors from per-run confound files and
//! computation of realignment derivatives.

mod builder;
mod table;

pub use builder::{build_regressors, compute_realign_derivs, gradient, is_realignment_column, DERIVATIVE_SUFFIX};
pub use table::ConfoundMatrix;
