//! On-disk snapshot: a JSON array of slab records.
//!
//! Writes replace the whole file through a temp file and a rename, so a
//! failed save leaves the previous snapshot readable. A sibling `.lock`
//! file keeps two watchers from writing the same snapshot.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;

use super::reconcile::Snapshot;
use crate::error::SlabError;
use crate::vendors::canonical::Slab;

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("slabs.json"));
    name.push(suffix);
    path.with_file_name(name)
}

pub fn lock_path(path: &Path) -> PathBuf {
    sibling(path, ".lock")
}

/// Load the snapshot at `path`.
///
/// A missing or blank file is an empty snapshot. A file that cannot be
/// read or does not decode is a `Config` error: continuing would overwrite it.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SlabError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::new()),
        Err(e) => {
            return Err(SlabError::Config(format!(
                "reading snapshot {}: {}",
                path.display(),
                e
            )))
        }
    };
    if content.trim().is_empty() {
        return Ok(Snapshot::new());
    }

    let records: Vec<Slab> = serde_json::from_str(&content)
        .map_err(|e| SlabError::Config(format!("parsing snapshot {}: {}", path.display(), e)))?;
    Ok(Snapshot::from_records(records))
}

fn write_json(path: &Path, snapshot: &Snapshot) -> Result<(), io::Error> {
    let records: Vec<&Slab> = snapshot.records().collect();

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;

    // Sync to disk before the rename makes it visible
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// Replace the snapshot at `path` with `snapshot`.
///
/// Any failure is a `Persistence` error and leaves the previous file intact.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SlabError> {
    let persistence = |what: &str, e: &dyn std::fmt::Display| {
        SlabError::Persistence(format!("{} {}: {}", what, path.display(), e))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| persistence("creating directory for", &e))?;
    }

    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path(path))
        .map_err(|e| persistence("opening lock for", &e))?;
    lock_file
        .try_lock_exclusive()
        .map_err(|e| persistence("another writer holds the lock on", &e))?;

    let temp_path = sibling(path, ".tmp");
    let result = write_json(&temp_path, snapshot)
        .and_then(|_| fs::rename(&temp_path, path))
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            persistence("writing", &e)
        });

    let _ = lock_file.unlock();
    result
}

/// Write `snapshot` next to `path` under a timestamped name after a failed
/// save, so the cycle's results can be recovered by hand.
pub fn write_recovery(
    path: &Path,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> Result<PathBuf, SlabError> {
    let recovery_path = sibling(path, &format!(".unsaved-{}.json", now.timestamp()));
    write_json(&recovery_path, snapshot).map_err(|e| {
        SlabError::Persistence(format!("writing recovery file {}: {}", recovery_path.display(), e))
    })?;
    Ok(recovery_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::reconcile::merge;
    use crate::vendors::canonical::{Finish, Vendor};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn snapshot() -> Snapshot {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let slabs = vec![
            Slab {
                lot: "6656".to_string(),
                bundle: "1497U".to_string(),
                finish: Finish::Polished,
                length: 130.0,
                count: 2,
                ..Slab::new(Vendor::Cosmos)
            },
            Slab {
                lot: "1187".to_string(),
                bundle: "C".to_string(),
                finish: Finish::Leather,
                length: 136.0,
                count: 3,
                ..Slab::new(Vendor::StoneBasyx)
            },
        ];
        merge(Snapshot::new(), slabs, now)
    }

    #[test]
    fn test_missing_file_is_empty_snapshot() {
        let dir = tempdir().unwrap();
        let loaded = load_snapshot(&dir.path().join("slabs.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");

        save_snapshot(&path, &snapshot()).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot());
        assert!(!sibling(&path, ".tmp").exists());
    }

    #[test]
    fn test_saved_document_is_record_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");
        save_snapshot(&path, &snapshot()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Lot"], "6656");
        assert_eq!(records[1]["Vendor"], 1);
    }

    #[test]
    fn test_malformed_snapshot_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");
        fs::write(&path, r#"[{"Lot": "1", "Count": "many"}]"#).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SlabError::Config(_)), "got {:?}", err);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreachable_snapshot_is_config_error() {
        let dir = tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();

        let err = load_snapshot(&blocker.join("slabs.json")).unwrap_err();
        assert!(matches!(err, SlabError::Config(_)));
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");
        save_snapshot(&path, &snapshot()).unwrap();

        // A directory where the temp file should go makes the write fail
        fs::create_dir(sibling(&path, ".tmp")).unwrap();
        let err = save_snapshot(&path, &Snapshot::new()).unwrap_err();

        assert!(matches!(err, SlabError::Persistence(_)));
        assert_eq!(load_snapshot(&path).unwrap(), snapshot());
    }

    #[test]
    fn test_save_refuses_while_locked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");

        let holder = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(&path))
            .unwrap();
        holder.lock_exclusive().unwrap();

        let err = save_snapshot(&path, &snapshot()).unwrap_err();
        assert!(matches!(err, SlabError::Persistence(_)));
        assert!(!path.exists());

        holder.unlock().unwrap();
        save_snapshot(&path, &snapshot()).unwrap();
    }

    #[test]
    fn test_write_recovery_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slabs.json");
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        let recovery = write_recovery(&path, &snapshot(), now).unwrap();

        assert_eq!(
            recovery.file_name().unwrap().to_str().unwrap(),
            format!("slabs.json.unsaved-{}.json", now.timestamp())
        );
        assert_eq!(load_snapshot(&recovery).unwrap(), snapshot());
    }
}
