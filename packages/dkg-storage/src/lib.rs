//! Snapshot persistence for the DKG construction engine: a single
//! `GraphSnapshotStore` implementation backed by the filesystem, one JSON
//! document per snapshot, matching the pipe-separated super-edge key and
//! version record spec.md §6 defines. The port itself lives in
//! `dkg_core::features::snapshot`; this crate is its sole implementation.

mod error;
mod filesystem;

pub use error::SnapshotIoError;
pub use filesystem::{load_snapshot, save_snapshot, FilesystemSnapshotStore};
