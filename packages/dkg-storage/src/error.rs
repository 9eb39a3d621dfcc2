//! Local I/O error wrapping for the filesystem snapshot store. Bridges into
//! `dkg_core::DkgError` at the crate boundary so callers driving the
//! pipeline through `GraphSnapshotStore` never see a storage-specific type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotIoError {
    #[error("failed to read snapshot at {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("failed to write snapshot at {path}: {source}")]
    Write { path: String, #[source] source: std::io::Error },

    #[error("failed to rename snapshot into place at {path}: {source}")]
    Rename { path: String, #[source] source: std::io::Error },

    #[error("malformed snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<SnapshotIoError> for dkg_core::DkgError {
    fn from(e: SnapshotIoError) -> Self {
        dkg_core::DkgError::storage(e.to_string()).with_source(e)
    }
}
