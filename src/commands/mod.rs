//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod extract_command;
pub mod inspect_command;

pub use cli::build_cli;
pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;
use crate::image::errors::RoiResult;

/// Factory for creating command instances based on CLI arguments
pub struct RoikitCommandFactory;

impl RoikitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RoikitCommandFactory
    }
}

impl Default for RoikitCommandFactory {
    fn default() -> Self {
        RoikitCommandFactory::new()
    }
}

impl CommandFactory for RoikitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> RoiResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args)?))
        } else {
            // Extraction is the default
            Ok(Box::new(ExtractCommand::new(args)?))
        }
    }
}
