//! Mask inspection command
//!
//! Reports the regions found in a mask and whether the input images share
//! its grid, without extracting anything.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::api::RoiKit;
use crate::commands::command_traits::Command;
use crate::commands::extract_command::parameters_from_args;
use crate::image::errors::{RoiError, RoiResult};

/// Command for summarising a mask and its target images
pub struct InspectCommand {
    /// Mask or atlas to inspect
    mask: PathBuf,
    /// Images to check against the mask
    input_files: Vec<PathBuf>,
}

impl InspectCommand {
    /// Create a new inspect command
    pub fn new(args: &ArgMatches) -> RoiResult<Self> {
        let params = parameters_from_args(args)?;
        let mask = params.mask
            .map(PathBuf::from)
            .ok_or_else(|| RoiError::Configuration("Missing mask image".to_string()))?;
        let input_files = params.input_files
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect();

        Ok(InspectCommand { mask, input_files })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> RoiResult<()> {
        info!("Inspecting mask {}", self.mask.display());

        let api = RoiKit::new();
        let summary = api.inspect(&self.mask, &self.input_files)?;
        println!("{}", summary);

        Ok(())
    }
}
