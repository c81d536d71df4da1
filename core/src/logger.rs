//! File-backed leveled logging
//!
//! The interactive session owns the terminal, so log output goes to an
//! append-only file selected with `--log`; without a configured file,
//! messages are discarded. `--verbose` lowers the threshold to DEBUG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

struct FileLogger {
    file_path: Option<PathBuf>,
    min_level: Level,
}

static LOGGER: OnceLock<Mutex<FileLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<FileLogger> {
    LOGGER.get_or_init(|| {
        Mutex::new(FileLogger {
            file_path: None,
            min_level: Level::Info,
        })
    })
}

/// Configure the log file and level threshold. Call once at startup.
pub fn init(file_path: Option<PathBuf>, verbose: bool) {
    let mut logger = get_logger().lock().unwrap();
    if let Some(path) = &file_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    logger.file_path = file_path;
    logger.min_level = if verbose { Level::Debug } else { Level::Info };
}

pub fn log(level: Level, module: &str, message: impl Into<String>) {
    let logger = get_logger().lock().unwrap();
    if level < logger.min_level {
        return;
    }
    let Some(path) = &logger.file_path else {
        return;
    };

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(
            file,
            "[{}] [{}] [{}] {}",
            timestamp,
            level.as_str(),
            module,
            message.into()
        );
    }
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Debug, module_path!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Info, module_path!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Warn, module_path!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Error, module_path!(), format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }
}
