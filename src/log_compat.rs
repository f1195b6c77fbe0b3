//! Compatibility bridge for the Rust `log` crate.
//!
//! This module provides `SocketLogger`, an implementation of `log::Log` that
//! turns each record into a JSON object and forwards it through the
//! process-wide client. The bridge is opt-in: call
//! [`install_global_logger`] once during start-up.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Metadata, Record};
use serde::Serialize;

use crate::error::LogError;

/// Records from these targets are never forwarded; they are the client's own
/// diagnostics and would otherwise feed back into the socket.
const OWN_TARGET: &str = "unixlog";

/// JSON shape written for each forwarded record.
#[derive(Debug, Serialize)]
pub struct LogRecordPayload<'a> {
    pub level: &'a str,
    pub target: &'a str,
    pub message: String,
    pub module_path: Option<&'a str>,
    pub file: Option<&'a str>,
    pub line: Option<u32>,
    pub timestamp_ms: u64,
}

impl<'a> From<&'a Record<'a>> for LogRecordPayload<'a> {
    fn from(record: &'a Record<'a>) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|dur| u64::try_from(dur.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        Self {
            level: record.level().as_str(),
            target: record.target(),
            message: record.args().to_string(),
            module_path: record.module_path(),
            file: record.file(),
            line: record.line(),
            timestamp_ms,
        }
    }
}

/// Adapter implementing the Rust `log::Log` trait.
pub struct SocketLogger;

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn is_enabled_by_global_max(level: log::Level) -> bool {
    log::max_level() >= level.to_level_filter()
}

impl log::Log for SocketLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        is_enabled_by_global_max(metadata.level()) && !is_own_target(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Records are plain strings and numbers, which always serialise.
        let _ = crate::log(&LogRecordPayload::from(record));
    }

    fn flush(&self) {}
}

static SOCKET_LOGGER: SocketLogger = SocketLogger;
static INSTALL_RESULT: OnceLock<bool> = OnceLock::new();

/// Install the bridge as the global Rust logger with `level` as the maximum.
///
/// Repeated calls after a successful install are no-ops and do not change
/// the level.
///
/// # Errors
///
/// Returns [`LogError::LoggerAlreadySet`] when a different global logger was
/// installed first. The outcome is cached.
pub fn install_global_logger(level: LevelFilter) -> Result<(), LogError> {
    let installed = *INSTALL_RESULT.get_or_init(|| {
        if log::set_logger(&SOCKET_LOGGER).is_err() {
            return false;
        }
        log::set_max_level(level);
        true
    });
    if installed {
        Ok(())
    } else {
        Err(LogError::LoggerAlreadySet)
    }
}
