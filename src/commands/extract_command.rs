//! Time series extraction command
//!
//! This module implements the command for extracting region or voxel time
//! series from functional images, combining command-line arguments with an
//! optional TOML parameter file.

use clap::ArgMatches;
use log::{error, info};
use std::path::Path;

use crate::api::RoiKit;
use crate::commands::command_traits::Command;
use crate::image::errors::{RoiError, RoiResult};
use crate::utils::config_utils::Parameters;
use crate::utils::format_utils::split_list;

/// Command for extracting time series into TSV tables
pub struct ExtractCommand {
    /// Merged parameters from file and command line
    params: Parameters,
}

impl ExtractCommand {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches) -> RoiResult<Self> {
        info!("Creating new extract command from arguments");
        let params = parameters_from_args(args)?;
        info!("Input files: {:?}", params.input_files);
        info!("Mask: {:?}", params.mask);
        info!("Output directory: {:?}", params.output_dir);
        Ok(ExtractCommand { params })
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> RoiResult<()> {
        info!("Executing extract command");

        let api = RoiKit::new().with_progress(true);
        match api.run(self.params.clone()) {
            Ok(outputs) => {
                for out in &outputs {
                    info!("Wrote {}", out.display());
                }
                Ok(())
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Collect parameters from the parameter file (if any) and the command line
///
/// Command-line values override values from the file.
pub fn parameters_from_args(args: &ArgMatches) -> RoiResult<Parameters> {
    let from_file = match args.get_one::<String>("config") {
        Some(path) => {
            info!("Reading parameter file: {}", path);
            Parameters::from_file(Path::new(path))?
        }
        None => Parameters::default(),
    };

    let input_files = args.get_many::<String>("input")
        .map(|values| values.cloned().collect::<Vec<String>>());

    let overrides = Parameters {
        input_files,
        mask: args.get_one::<String>("mask").cloned(),
        output_dir: args.get_one::<String>("output").cloned(),
        labels: args.get_one::<String>("labels").map(|s| split_list(s)),
        regressor_files: args.get_one::<String>("regressor-files").map(|s| split_list(s)),
        regressor_names: args.get_one::<String>("regressors").map(|s| split_list(s)),
        realign_derivs: flag(args, "realign-derivs"),
        as_voxels: flag(args, "as-voxels"),
        discard_scans: parse_arg::<usize>(args, "discard-scans")?,
        n_jobs: parse_arg::<usize>(args, "n-jobs")?,
        t_r: parse_arg::<f64>(args, "t-r")?,
        standardize: flag(args, "standardize"),
        detrend: flag(args, "detrend"),
    };

    Ok(from_file.merge(overrides))
}

/// `--<id>` sets the option, `--no-<id>` clears it; neither leaves the file value
fn flag(args: &ArgMatches, id: &str) -> Option<bool> {
    let negated = format!("no-{}", id);
    if args.get_flag(id) {
        Some(true)
    } else if args.get_flag(&negated) {
        Some(false)
    } else {
        None
    }
}

fn parse_arg<T: std::str::FromStr>(args: &ArgMatches, id: &str) -> RoiResult<Option<T>> {
    match args.get_one::<String>(id) {
        Some(value) => value.parse::<T>()
            .map(Some)
            .map_err(|_| RoiError::Configuration(format!("Invalid value for --{}: {}", id, value))),
        None => Ok(None),
    }
}
