// Library exports for the watcher binary and integration tests

pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod notifier;
pub mod poller;
pub mod shutdown;
pub mod vendors;

pub use error::SlabError;
pub use inventory::{Fingerprint, Selection, Snapshot};
pub use poller::{CycleReport, SlabWatcher, WatchSettings};
pub use vendors::{Finish, Slab, Vendor, VendorAdapter};
