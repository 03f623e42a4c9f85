/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Provide structured, append-only logging for notification
    attempts, suppressions, and transport outcomes.

  Security / Safety Notes:
    Callers never pass payload bytes or API keys to the
    logger; entries carry classes, stages, and statuses only.

  Dependencies:
    std::fs::File, std::sync::Mutex, chrono for timestamps,
    sha2 for session integrity hashing.

  Operational Scope:
    Held by the client (quiet by default) and configured by
    the `bugsnag-notify` binary for session logs.

  Revision History:
    2026-10-16 COD  Adapted logging module for the notifier.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{NotifierError, Result};

/// Structured log level for notifier events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Where console output goes, if anywhere.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Console {
    Silent,
    /// WARN and ERROR only.
    Problems,
    All,
}

/// Logger emitting `<timestamp> [LEVEL] [CODE] message` entries.
pub struct Logger {
    file: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    console: Console,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("console", &self.console)
            .finish()
    }
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let file = if let Some(ref file_path) = path {
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    NotifierError::Filesystem(format!(
                        "Failed to create log directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)
                .map_err(|err| {
                    NotifierError::Filesystem(format!(
                        "Failed to open log file {}: {err}",
                        file_path.display()
                    ))
                })?;
            Some(Mutex::new(BufWriter::new(file)))
        } else {
            None
        };

        Ok(Self {
            file,
            path,
            console: if verbose {
                Console::All
            } else {
                Console::Problems
            },
        })
    }

    /// A logger that discards everything. Library default.
    pub fn quiet() -> Self {
        Self {
            file: None,
            path: None,
            console: Console::Silent,
        }
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        if self.console == Console::Silent && self.file.is_none() {
            return;
        }
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let entry = format!(
            "{timestamp} [{}] [{}] {}",
            level.as_str(),
            code,
            message.as_ref()
        );

        let to_console = match self.console {
            Console::Silent => false,
            Console::Problems => matches!(level, LogLevel::Warn | LogLevel::Error),
            Console::All => true,
        };
        if to_console {
            eprintln!("{entry}");
        }

        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                if writeln!(guard, "{entry}").is_err() || guard.flush().is_err() {
                    eprintln!(
                        "{} [{}] [LOGGER] Failed to write to log file",
                        timestamp,
                        LogLevel::Error.as_str()
                    );
                }
            }
        }
    }

    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Compute and persist the SHA-256 digest of the log file as `<log>.hash`.
    pub fn finalize(&self) -> Result<Option<PathBuf>> {
        let Some(path) = self.path() else {
            return Ok(None);
        };
        let data = std::fs::read(path).map_err(|err| {
            NotifierError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);
        let mut hash_os = path.as_os_str().to_os_string();
        hash_os.push(".hash");
        let hash_path = PathBuf::from(hash_os);
        let mut file = File::create(&hash_path).map_err(|err| {
            NotifierError::Filesystem(format!(
                "Failed to create hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        writeln!(
            file,
            "{:x}  {}",
            digest,
            path.file_name().unwrap_or_default().to_string_lossy()
        )
        .map_err(|err| {
            NotifierError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })?;
        Ok(Some(hash_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entries_carry_level_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/notify.log");
        let logger = Logger::new(Some(path.clone()), false).unwrap();
        logger.debug("NOTIFY", "sending 1 exception(s)");
        logger.warn("HTTP", "status 429");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[DEBUG] [NOTIFY] sending 1 exception(s)"));
        assert!(lines[1].ends_with("[WARN] [HTTP] status 429"));
    }

    #[test]
    fn finalize_writes_digest_next_to_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");
        let logger = Logger::new(Some(path.clone()), false).unwrap();
        logger.info("INIT", "ready");

        let hash_path = logger.finalize().unwrap().unwrap();
        let digest_line = std::fs::read_to_string(hash_path).unwrap();
        let expected = format!("{:x}", Sha256::digest(std::fs::read(&path).unwrap()));
        assert_eq!(digest_line.trim_end(), format!("{expected}  session.log"));
    }

    #[test]
    fn quiet_logger_has_nothing_to_finalize() {
        let logger = Logger::quiet();
        logger.error("HTTP", "ignored");
        assert!(logger.finalize().unwrap().is_none());
    }
}
