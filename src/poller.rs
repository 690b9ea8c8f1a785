//! Poll cycle orchestration.
//!
//! A cycle fetches every vendor, folds the batch into the snapshot, writes
//! the snapshot back and announces slabs that are both long enough and new.
//! Cycles never overlap: the loop waits for one to finish, then sleeps for
//! the poll interval before starting the next.

use std::mem;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::{load_webhook_url, SlabFinderConfig};
use crate::error::SlabError;
use crate::inventory::{
    load_snapshot, merge, save_snapshot, select, write_recovery, RetentionPolicy, Selection,
    Snapshot,
};
use crate::logging::log_warn;
use crate::notifier::{Notification, WebhookNotifier};
use crate::shutdown::ShutdownCoordinator;
use crate::vendors::common::build_client;
use crate::vendors::{default_adapters, fetch_all, VendorAdapter};

/// Tunables for a watcher, usually taken from the config file
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSettings {
    pub snapshot_path: PathBuf,
    pub min_length: f64,
    pub poll_interval: Duration,
    pub retention: RetentionPolicy,
}

impl WatchSettings {
    pub fn from_config(config: &SlabFinderConfig) -> Result<Self, SlabError> {
        Ok(Self {
            snapshot_path: config.snapshot_path()?,
            min_length: config.min_length(),
            poll_interval: config.poll_interval(),
            retention: RetentionPolicy::new(config.retention_horizon()),
        })
    }
}

/// What one cycle did
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Slabs returned by all adapters together
    pub fetched: usize,
    /// Snapshot size after merging and retention
    pub snapshot_size: usize,
    /// Records removed by the retention policy
    pub expired: usize,
    pub selection: Selection,
    /// Notifications the webhook accepted
    pub delivered: usize,
}

pub struct SlabWatcher {
    adapters: Vec<Arc<dyn VendorAdapter>>,
    client: reqwest::Client,
    snapshot: Snapshot,
    settings: WatchSettings,
    notifier: Option<WebhookNotifier>,
}

impl SlabWatcher {
    pub fn new(
        adapters: Vec<Arc<dyn VendorAdapter>>,
        client: reqwest::Client,
        snapshot: Snapshot,
        settings: WatchSettings,
    ) -> Self {
        Self {
            adapters,
            client,
            snapshot,
            settings,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Option<WebhookNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Wire up a watcher from the config file: the default adapters, the
    /// stored snapshot, and the webhook if one is configured.
    pub fn from_config(config: &SlabFinderConfig) -> Result<Self, SlabError> {
        let settings = WatchSettings::from_config(config)?;
        let client = build_client(config.request_timeout())?;
        let snapshot = load_snapshot(&settings.snapshot_path)?;
        info!(
            path = %settings.snapshot_path.display(),
            records = snapshot.len(),
            "Loaded snapshot"
        );

        let webhook_file = config.webhook_file()?;
        let notifier = match load_webhook_url(&webhook_file) {
            Some(url) => Some(WebhookNotifier::new(
                client.clone(),
                url,
                config.notify_username(),
            )),
            None => {
                warn!(
                    "No webhook URL in {}; notifications disabled",
                    webhook_file.display()
                );
                None
            }
        };

        Ok(Self::new(default_adapters(config), client, snapshot, settings).with_notifier(notifier))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    /// Run one poll cycle stamped with `now`.
    ///
    /// Only a failed snapshot write is an error. The unsaved snapshot is then
    /// written to a recovery file next to the real one and no notifications
    /// go out.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<CycleReport, SlabError> {
        let fresh = fetch_all(&self.adapters, &self.client).await;
        let fetched = fresh.len();

        let mut snapshot = merge(mem::take(&mut self.snapshot), fresh, now);
        let expired = self.settings.retention.apply(&mut snapshot, now);
        self.snapshot = snapshot;

        info!(
            fetched,
            snapshot = self.snapshot.len(),
            expired,
            "Merged fresh slabs"
        );

        if let Err(e) = save_snapshot(&self.settings.snapshot_path, &self.snapshot) {
            error!("{}", e);
            match write_recovery(&self.settings.snapshot_path, &self.snapshot, now) {
                Ok(path) => error!("Unsaved snapshot written to {}", path.display()),
                Err(recovery_err) => error!("{}", recovery_err),
            }
            return Err(e);
        }

        let selection = select(&self.snapshot, self.settings.min_length).seen_at(now);
        info!(
            tracked = selection.tracked.len(),
            new = selection.newly_interesting.len(),
            "Selected slabs"
        );
        for slab in &selection.newly_interesting {
            info!(fingerprint = %slab.fingerprint(), "Interesting new slab: {}", slab);
        }

        let delivered = self.notify(&selection).await;

        Ok(CycleReport {
            fetched,
            snapshot_size: self.snapshot.len(),
            expired,
            selection,
            delivered,
        })
    }

    async fn notify(&self, selection: &Selection) -> usize {
        let Some(notifier) = &self.notifier else {
            return 0;
        };

        let mut delivered = 0;
        for slab in &selection.newly_interesting {
            match notifier.send(&Notification::from(slab)).await {
                Ok(()) => delivered += 1,
                Err(e) => log_warn("notifier", &e.to_string()).unwrap_or_default(),
            }
        }
        delivered
    }

    /// Poll until `shutdown` fires.
    ///
    /// Shutdown is checked before each cycle and interrupts the wait between
    /// cycles; a cycle that has started runs to completion.
    pub async fn run(&mut self, shutdown: &ShutdownCoordinator) -> Result<(), SlabError> {
        let mut shutdown_rx = shutdown.subscribe();

        while !shutdown.is_shutdown() {
            self.run_cycle(Utc::now()).await?;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
                _ = shutdown_rx.recv() => {
                    info!("Shutdown requested, stopping poll loop");
                    break;
                }
            }
        }

        Ok(())
    }
}
