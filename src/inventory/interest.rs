use chrono::{DateTime, Utc};

use super::reconcile::Snapshot;
use crate::vendors::canonical::Slab;

/// Outcome of filtering a snapshot for long slabs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Every slab at least `min_length` inches long
    pub tracked: Vec<Slab>,
    /// Tracked slabs observed for the first time in the latest cycle
    pub newly_interesting: Vec<Slab>,
}

impl Selection {
    /// Keep only first sightings stamped by the cycle at `now`. A record that
    /// was seen once and then dropped off its listing still has
    /// `first_seen == last_seen`, but it is not new any more.
    pub fn seen_at(mut self, now: DateTime<Utc>) -> Self {
        self.newly_interesting.retain(|slab| slab.last_seen == now);
        self
    }
}

pub fn select(snapshot: &Snapshot, min_length: f64) -> Selection {
    let tracked: Vec<Slab> = snapshot
        .records()
        .filter(|slab| slab.length >= min_length)
        .cloned()
        .collect();
    let newly_interesting = tracked.iter().filter(|slab| slab.is_new()).cloned().collect();

    Selection {
        tracked,
        newly_interesting,
    }
}
