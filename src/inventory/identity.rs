use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::vendors::canonical::Slab;

// ASCII unit separator
const FIELD_SEPARATOR: &str = "\u{1f}";

/// Stable identity of a slab across poll cycles and restarts
///
/// Derived from vendor, finish, thickness, color, lot, bundle and photo.
/// Width, length, count and price are deliberately left out so that a lot
/// whose stock or measurements change keeps its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Text the fingerprint is hashed from
pub fn encode(slab: &Slab) -> String {
    let fields = [
        slab.vendor.name().to_string(),
        slab.finish.name().to_string(),
        slab.thickness.to_string(),
        slab.color.clone(),
        slab.lot.clone(),
        slab.bundle.clone(),
        slab.photo.clone(),
    ];
    fields.join(FIELD_SEPARATOR)
}

impl Slab {
    /// Recomputed on every call; never stored with the record
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = FxHasher::default();
        hasher.write(encode(self).as_bytes());
        Fingerprint(hasher.finish())
    }
}
