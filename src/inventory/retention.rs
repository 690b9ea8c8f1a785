use chrono::{DateTime, Duration, Utc};

use super::reconcile::Snapshot;

/// Bounds snapshot growth by age of the last sighting
///
/// Applied just before the snapshot is written; reconciliation itself never
/// drops records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// `None` keeps everything
    pub horizon: Option<Duration>,
}

impl RetentionPolicy {
    pub fn keep_all() -> Self {
        Self { horizon: None }
    }

    pub fn new(horizon: Option<Duration>) -> Self {
        Self { horizon }
    }

    /// Drop records last seen before `now - horizon`; returns how many went
    pub fn apply(&self, snapshot: &mut Snapshot, now: DateTime<Utc>) -> usize {
        let Some(horizon) = self.horizon else {
            return 0;
        };
        let cutoff = now - horizon;
        let before = snapshot.len();
        snapshot.retain(|slab| slab.last_seen >= cutoff);
        before - snapshot.len()
    }
}
