//! Textual, filesystem-backed `GraphSnapshotStore`: one JSON document per
//! snapshot, written atomically (write-to-temp, then rename) so a crash or
//! concurrent reader never observes a half-written file.

use crate::error::SnapshotIoError;
use dkg_core::features::snapshot::{GraphSnapshotStore, Snapshot};
use dkg_core::DkgResult;
use std::fs;
use std::path::{Path, PathBuf};

/// A `GraphSnapshotStore` backed by a single path on disk.
pub struct FilesystemSnapshotStore {
    path: PathBuf,
}

impl FilesystemSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        let file_name = tmp
            .file_name()
            .map(|n| format!("{}.tmp", n.to_string_lossy()))
            .unwrap_or_else(|| "snapshot.tmp".to_string());
        tmp.set_file_name(file_name);
        tmp
    }
}

impl GraphSnapshotStore for FilesystemSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> DkgResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SnapshotIoError::Write {
                    path: self.path.display().to_string(),
                    source,
                })?;
            }
        }

        let tmp = self.tmp_path();
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(SnapshotIoError::Serialize)?;
        fs::write(&tmp, bytes).map_err(|source| SnapshotIoError::Write {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| SnapshotIoError::Rename {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    fn load(&self) -> DkgResult<Snapshot> {
        let bytes = fs::read(&self.path).map_err(|source| SnapshotIoError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        let snapshot = serde_json::from_slice(&bytes).map_err(SnapshotIoError::Serialize)?;
        Ok(snapshot)
    }
}

/// Convenience entry points for callers that don't want to hold a store
/// value around for a single save/load.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &Snapshot) -> DkgResult<()> {
    FilesystemSnapshotStore::new(path.as_ref().to_path_buf()).save(snapshot)
}

pub fn load_snapshot(path: impl AsRef<Path>) -> DkgResult<Snapshot> {
    FilesystemSnapshotStore::new(path.as_ref().to_path_buf()).load()
}
