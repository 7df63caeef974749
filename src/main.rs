use std::process;
use log::{error, LevelFilter};

use roikit::utils::logger::Logger;
use roikit::commands::{build_cli, CommandFactory, RoikitCommandFactory};

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = matches.get_one::<String>("log-file").map(|s| s.as_str());
    if let Err(e) = Logger::init_global_logger(log_file, level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = RoikitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
