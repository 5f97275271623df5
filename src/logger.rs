//! Size-rotated file logger for the `log` facade.
//!
//! The terminal is in raw mode while the game runs, so nothing may be written
//! to stdout or stderr; every record goes to a file instead, one line each:
//! `2026-01-01 12:00:00,000 - INFO - message`.
//!
//! When a line would take the file to `max_bytes`, the file is renamed to
//! `<path>.1` (replacing any older backup) and a fresh file is started. A
//! `max_bytes` of 0 disables rotation.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{LevelFilter, Log, Metadata, Record};

/// Default size limit of the log file: 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

struct LogFile {
    file: File,
    written: u64,
}

pub struct FileLogger {
    level: LevelFilter,
    path: PathBuf,
    max_bytes: u64,
    inner: Mutex<LogFile>,
}

impl FileLogger {
    /// Open `path` for appending; existing content counts toward the limit.
    pub fn open(path: &Path, level: LevelFilter, max_bytes: u64) -> io::Result<Self> {
        let file = open_append(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            level,
            path: path.to_path_buf(),
            max_bytes,
            inner: Mutex::new(LogFile { file, written }),
        })
    }

    /// Where the previous file goes on rotation.
    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path)
    }

    fn rotate(&self, log: &mut LogFile) -> io::Result<()> {
        log.file.flush()?;
        let backup = self.backup_path();
        if backup.exists() {
            fs::remove_file(&backup)?;
        }
        fs::rename(&self.path, &backup)?;
        log.file = open_append(&self.path)?;
        log.written = 0;
        Ok(())
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let Ok(mut log) = self.inner.lock() else {
            return Ok(());
        };
        let len = line.len() as u64;
        if self.max_bytes > 0 && log.written > 0 && log.written + len >= self.max_bytes {
            self.rotate(&mut log)?;
        }
        log.file.write_all(line.as_bytes())?;
        log.written += len;
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(Local::now(), record.level(), record.args());
        let _ = self.write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut log) = self.inner.lock() {
            let _ = log.file.flush();
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".1");
    PathBuf::from(name)
}

/// One log line, newline included.
pub fn format_line(
    at: DateTime<Local>,
    level: log::Level,
    args: &std::fmt::Arguments<'_>,
) -> String {
    format!("{} - {} - {}\n", at.format("%Y-%m-%d %H:%M:%S,%3f"), level, args)
}

/// Install a [`FileLogger`] writing to `path` as the global logger.
pub fn init(path: &Path, level: LevelFilter, max_bytes: u64) -> Result<()> {
    let logger = FileLogger::open(path, level, max_bytes)
        .with_context(|| format!("opening log file {}", path.display()))?;

    log::set_boxed_logger(Box::new(logger)).context("a global logger is already installed")?;
    log::set_max_level(level);
    Ok(())
}
