//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, mirroring records to the console and to an
//! optional log file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level recorded
    level: LevelFilter,
    /// Whether records are also printed to the console
    console: bool,
}

impl Logger {
    /// Creates a new logger writing to `log_file`
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: LevelFilter::Info,
            console: true,
        })
    }

    /// Creates a logger that only prints to the console
    pub fn console_only() -> Self {
        Logger {
            file: Mutex::new(None),
            level: LevelFilter::Info,
            console: true,
        }
    }

    /// Sets the most verbose level recorded
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enables or disables console output
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Static method to initialize the global logger
    ///
    /// # Arguments
    ///
    /// * `log_file` - Optional log file; console only when `None`
    /// * `level` - Most verbose level recorded
    pub fn init_global_logger(log_file: Option<&str>, level: LevelFilter) -> io::Result<()> {
        let global_logger = match log_file {
            Some(path) => Logger::new(path)?,
            None => Logger::console_only(),
        }.with_level(level);

        // Only called once at startup
        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.log(&message);

            if self.console {
                println!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
