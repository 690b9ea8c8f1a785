use crate::error::SlabError;
use crate::vendors::cosmos::CosmosPage;
use crate::vendors::stonebasyx::StoneBasyxPage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that relocates the app home directory
pub const HOME_ENV_VAR: &str = "SLABFINDER_HOME";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 15 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MIN_LENGTH: f64 = 132.0;
const DEFAULT_NOTIFY_USERNAME: &str = "SlabFinder";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SlabFinderConfig {
    pub snapshot_path: Option<String>,
    pub webhook_file: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub min_length: Option<f64>,
    pub request_timeout_secs: Option<u64>,
    /// Drop snapshot entries not seen for this many days; absent keeps everything
    pub retention_days: Option<u32>,
    pub notify_username: Option<String>,
    pub stonebasyx_pages: Option<Vec<StoneBasyxPage>>,
    pub cosmos_pages: Option<Vec<CosmosPage>>,
}

impl SlabFinderConfig {
    pub fn snapshot_path(&self) -> Result<PathBuf, SlabError> {
        match &self.snapshot_path {
            Some(path) => Ok(expand_path(path)),
            None => Ok(get_config_dir()?.join("slabs.json")),
        }
    }

    pub fn webhook_file(&self) -> Result<PathBuf, SlabError> {
        match &self.webhook_file {
            Some(path) => Ok(expand_path(path)),
            None => Ok(get_config_dir()?.join("webhook")),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn min_length(&self) -> f64 {
        self.min_length.unwrap_or(DEFAULT_MIN_LENGTH)
    }

    pub fn retention_horizon(&self) -> Option<chrono::Duration> {
        self.retention_days
            .map(|days| chrono::Duration::days(i64::from(days)))
    }

    pub fn notify_username(&self) -> &str {
        self.notify_username
            .as_deref()
            .unwrap_or(DEFAULT_NOTIFY_USERNAME)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

pub fn get_config_dir() -> Result<PathBuf, SlabError> {
    if let Some(dir) = std::env::var_os(HOME_ENV_VAR) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(home_dir) = dirs::home_dir() {
        Ok(home_dir.join(".slabfinder"))
    } else {
        Err(SlabError::Config("Could not find home directory".to_string()))
    }
}

pub fn get_config_file_path() -> Result<PathBuf, SlabError> {
    Ok(get_config_dir()?.join("config.json"))
}

pub fn get_logs_dir() -> Result<PathBuf, SlabError> {
    Ok(get_config_dir()?.join("logs"))
}

/// Create `dir` (and parents) if missing, owner-only on Unix
pub fn ensure_private_dir(dir: &Path) -> Result<(), SlabError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;

        // Set permissions to 700 (read/write/execute for owner only) on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(dir)?;
            let mut permissions = metadata.permissions();
            permissions.set_mode(0o700);
            fs::set_permissions(dir, permissions)?;
        }
    }
    Ok(())
}

pub fn ensure_config_dir() -> Result<(), SlabError> {
    ensure_private_dir(&get_config_dir()?)
}

pub fn ensure_logs_dir() -> Result<(), SlabError> {
    ensure_private_dir(&get_logs_dir()?)
}

pub fn load_config() -> Result<SlabFinderConfig, SlabError> {
    ensure_config_dir()?;
    load_config_from(&get_config_file_path()?)
}

/// Missing file means defaults; unreadable or malformed content is a
/// `Config` error.
pub fn load_config_from(config_file: &Path) -> Result<SlabFinderConfig, SlabError> {
    if !config_file.exists() {
        return Ok(SlabFinderConfig::default());
    }

    let content = fs::read_to_string(config_file).map_err(|e| {
        SlabError::Config(format!("reading {}: {}", config_file.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| SlabError::Config(format!("parsing {}: {}", config_file.display(), e)))
}

pub fn save_config(config: &SlabFinderConfig) -> Result<(), SlabError> {
    ensure_config_dir()?;

    let config_file = get_config_file_path()?;
    let content = serde_json::to_string_pretty(config)?;

    fs::write(&config_file, content)?;

    // Set permissions to 600 (read/write for owner only) on Unix systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(&config_file)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(&config_file, permissions)?;
    }

    Ok(())
}

/// Read the webhook URL once at startup.
///
/// Absence (missing file, empty file) yields `None`; notifications are then
/// disabled but the rest of the pipeline runs.
pub fn load_webhook_url(webhook_file: &Path) -> Option<String> {
    let content = fs::read_to_string(webhook_file).ok()?;
    let url = content.trim();
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}
