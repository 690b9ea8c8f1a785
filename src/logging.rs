use crate::config::{ensure_logs_dir, get_logs_dir};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{
    fmt::{self},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB
const MAX_LOG_BACKUPS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub vendor: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

static LOGGER_INITIALIZED: std::sync::Once = std::sync::Once::new();

// Keep the guard alive for the lifetime of the program
static FILE_APPENDER_GUARD: LazyLock<Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> =
    LazyLock::new(|| Mutex::new(None));

pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    ensure_logs_dir()?;
    let logs_dir = get_logs_dir()?;

    LOGGER_INITIALIZED.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let console_layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_filter(env_filter.clone());

        let file_appender = tracing_appender::rolling::never(&logs_dir, "app.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if let Ok(mut guard_mutex) = FILE_APPENDER_GUARD.lock() {
            *guard_mutex = Some(guard);
        }

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_filter(env_filter);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
    });

    Ok(())
}

/// Per-vendor event file, once `init_logging` has set up the logs directory
fn vendor_log_path(vendor: &str) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    if !LOGGER_INITIALIZED.is_completed() {
        return Ok(None);
    }
    ensure_logs_dir()?;
    Ok(Some(get_logs_dir()?.join(format!("{}.log", vendor))))
}

/// Emit an event through `tracing` and append it to `<logs>/<vendor>.log`.
/// Without `init_logging` the event only goes to `tracing`.
pub fn log_vendor_event(
    vendor: &str,
    level: &str,
    message: &str,
    details: Option<serde_json::Value>,
) -> Result<(), Box<dyn std::error::Error>> {
    match level {
        "ERROR" => error!(vendor = vendor, "{}", message),
        "WARN" => warn!(vendor = vendor, "{}", message),
        "DEBUG" => debug!(vendor = vendor, "{}", message),
        _ => info!(vendor = vendor, "{}", message),
    }

    let Some(log_file_path) = vendor_log_path(vendor)? else {
        return Ok(());
    };
    let log_entry = LogEntry {
        timestamp: Utc::now().to_rfc3339(),
        level: level.to_string(),
        vendor: vendor.to_string(),
        message: message.to_string(),
        details,
    };
    write_log_entry(&log_file_path, &log_entry)
}

fn write_log_entry(log_file_path: &Path, entry: &LogEntry) -> Result<(), Box<dyn std::error::Error>> {
    if should_rotate_log(log_file_path)? {
        rotate_log_file(log_file_path)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let json_line = serde_json::to_string(entry)?;
    writeln!(file, "{}", json_line)?;
    file.flush()?;

    Ok(())
}

fn should_rotate_log(log_file_path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    if !log_file_path.exists() {
        return Ok(false);
    }

    let metadata = std::fs::metadata(log_file_path)?;
    Ok(metadata.len() > MAX_LOG_SIZE)
}

fn rotate_log_file(log_file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Shift backups up by one (4 -> 5, 3 -> 4, ...); the oldest is overwritten
    for i in (1..MAX_LOG_BACKUPS).rev() {
        let current_backup = log_file_path.with_extension(format!("log.{}", i));
        let next_backup = log_file_path.with_extension(format!("log.{}", i + 1));

        if current_backup.exists() {
            std::fs::rename(&current_backup, &next_backup)?;
        }
    }

    if log_file_path.exists() {
        let first_backup = log_file_path.with_extension("log.1");
        std::fs::rename(log_file_path, first_backup)?;
    }

    Ok(())
}

// Convenience functions for different log levels
pub fn log_debug(vendor: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    log_vendor_event(vendor, "DEBUG", message, None)
}

pub fn log_info(vendor: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    log_vendor_event(vendor, "INFO", message, None)
}

pub fn log_warn(vendor: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    log_vendor_event(vendor, "WARN", message, None)
}

pub fn log_error(vendor: &str, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    log_vendor_event(vendor, "ERROR", message, None)
}
