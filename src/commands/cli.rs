//! Command-line interface definition

use clap::{Arg, ArgAction, Command as ClapCommand};

/// Switches paired with the `--no-` form that turns them off again; the
/// last one given wins and either overrides a parameter file
pub const SWITCHES: [(&str, &str); 4] = [
    ("realign-derivs", "no-realign-derivs"),
    ("as-voxels", "no-as-voxels"),
    ("standardize", "no-standardize"),
    ("detrend", "no-detrend"),
];

/// Build the `roikit` command-line parser
pub fn build_cli() -> ClapCommand {
    let cli = ClapCommand::new("RoiKit")
        .version("0.1")
        .author("Maurice Schilpp")
        .about("Extract region or voxel time series from 4-D NIfTI images")
        .arg(
            Arg::new("input")
                .help("Input functional NIfTI images")
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("mask")
                .short('m')
                .long("mask")
                .help("Binary mask or labeled atlas; 0 is background")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory for the time series tables (default: .)")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML parameter file; command-line values take precedence")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("labels")
                .long("labels")
                .help("Comma separated column labels, in ascending label order")
                .value_name("A,B,...")
                .required(false),
        )
        .arg(
            Arg::new("regressor-files")
                .long("regressor-files")
                .help("Comma separated confound files, one per input image")
                .value_name("FILES")
                .required(false),
        )
        .arg(
            Arg::new("regressors")
                .long("regressors")
                .help("Comma separated confound columns to regress out")
                .value_name("NAMES")
                .required(false),
        )
        .arg(
            Arg::new("realign-derivs")
                .long("realign-derivs")
                .help("Add temporal derivatives of the rotation/translation confounds")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("as-voxels")
                .long("as-voxels")
                .help("Output every voxel of a binary mask instead of the mean")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("standardize")
                .long("standardize")
                .help("Z-score each output time series")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("detrend")
                .long("detrend")
                .help("Remove linear trends from signals and confounds")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("t-r")
                .long("t-r")
                .help("Repetition time in seconds")
                .value_name("SECONDS")
                .required(false),
        )
        .arg(
            Arg::new("discard-scans")
                .long("discard-scans")
                .help("Number of leading scans to discard from each image")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("n-jobs")
                .short('j')
                .long("n-jobs")
                .help("Number of images processed in parallel (default: 1)")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Summarise the mask and input images without extracting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file path")
                .value_name("FILE")
                .default_value("roikit.log")
                .required(false),
        );

    negated_switches(cli)
}

fn negated_switches(cli: ClapCommand) -> ClapCommand {
    SWITCHES.iter().fold(cli, |cli, &(on, off)| {
        cli.mut_arg(on, |arg| arg.overrides_with(off))
            .arg(
                Arg::new(off)
                    .long(off)
                    .help("Turn the matching switch off")
                    .action(ArgAction::SetTrue)
                    .overrides_with(on),
            )
    })
}
