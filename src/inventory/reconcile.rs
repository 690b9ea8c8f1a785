use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::identity::Fingerprint;
use crate::vendors::canonical::Slab;

/// Every slab ever observed, keyed by fingerprint
///
/// Iteration follows insertion order: records loaded from disk first, then
/// slabs seen for the first time in the order their batches listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: IndexMap<Fingerprint, Slab>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index stored records by their recomputed fingerprint. When two
    /// records share a fingerprint the later one wins.
    pub fn from_records(records: impl IntoIterator<Item = Slab>) -> Self {
        let entries = records
            .into_iter()
            .map(|slab| (slab.fingerprint(), slab))
            .collect();
        Self { entries }
    }

    pub fn records(&self) -> impl Iterator<Item = &Slab> {
        self.entries.values()
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&Slab> {
        self.entries.get(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only records matching `keep`, preserving order
    pub fn retain(&mut self, mut keep: impl FnMut(&Slab) -> bool) {
        self.entries.retain(|_, slab| keep(slab));
    }
}

/// Fold one cycle's fresh batch into the snapshot.
///
/// A slab already known keeps its `first_seen`; everything else about it
/// comes from the fresh record. Unknown slabs start with
/// `first_seen == last_seen == now`. Records absent from `fresh` are left
/// untouched.
pub fn merge(mut snapshot: Snapshot, fresh: Vec<Slab>, now: DateTime<Utc>) -> Snapshot {
    for mut slab in fresh {
        let fingerprint = slab.fingerprint();
        slab.first_seen = snapshot
            .entries
            .get(&fingerprint)
            .map(|prior| prior.first_seen)
            .unwrap_or(now);
        slab.last_seen = now;
        snapshot.entries.insert(fingerprint, slab);
    }
    snapshot
}
