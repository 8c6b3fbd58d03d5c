//! Logging pipeline for build runs.
//!
//! A single `BuildLogger` backs the `log` crate facade: every record goes to
//! stderr for the terminal and is appended to a timestamped file under the
//! logs directory for later inspection. The whole driver is single-threaded,
//! so a plain mutex around the file handle satisfies `log::Log`'s `&self`
//! contract without any channel machinery.

use chrono::Local;
use log::{Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Get the global logs path relative to the current working directory: ./logs
pub fn global_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// File-and-stderr logger registered as the global `log` backend.
pub struct BuildLogger {
    file: Mutex<File>,
}

impl BuildLogger {
    /// Open a session log file under `log_dir`.
    pub fn open(log_dir: &Path) -> Result<BuildLogger, String> {
        ensure_logs_dir_exists(log_dir)?;
        let file_name = format!("hlsbuild_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        let path = log_dir.join(file_name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
        Ok(BuildLogger {
            file: Mutex::new(file),
        })
    }

    /// Register a logger for the whole process and set the level filter.
    pub fn init(log_dir: &Path) -> Result<(), String> {
        let logger = BuildLogger::open(log_dir)?;
        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(log::LevelFilter::Info))
            .map_err(|e| format!("Failed to set global logger: {}", e))
    }
}

impl Log for BuildLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} [{}] {}",
            Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.args()
        );
        eprintln!("{}", line);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logger_writes_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let logger = BuildLogger::open(temp_dir.path()).unwrap();

        logger.log(
            &log::Record::builder()
                .args(format_args!("synthesis started"))
                .level(log::Level::Info)
                .target("hlsbuild")
                .build(),
        );
        logger.flush();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let content = std::fs::read_to_string(&entries[0]).unwrap();
        assert!(content.contains("[INFO] synthesis started"));
    }

    #[test]
    fn test_debug_records_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let logger = BuildLogger::open(temp_dir.path()).unwrap();

        logger.log(
            &log::Record::builder()
                .args(format_args!("noisy detail"))
                .level(log::Level::Debug)
                .target("hlsbuild")
                .build(),
        );
        logger.flush();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        let content = std::fs::read_to_string(&entries[0]).unwrap();
        assert!(!content.contains("noisy detail"));
    }
}
