// Cross-cycle bookkeeping: which slabs have been seen, since when, and
// which of them are worth announcing.

pub mod identity;
pub mod interest;
pub mod reconcile;
pub mod retention;
pub mod store;

pub use identity::Fingerprint;
pub use interest::{select, Selection};
pub use reconcile::{merge, Snapshot};
pub use retention::RetentionPolicy;
pub use store::{load_snapshot, save_snapshot, write_recovery};
