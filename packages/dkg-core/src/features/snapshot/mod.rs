//! Snapshot: the in-memory shape persisted by `dkg-storage`. This feature
//! owns the shape and the `GraphSnapshotStore` port only; the textual
//! (de)serialization itself lives in `dkg-storage`, which depends on this
//! crate for the types it serializes.

pub mod domain;

pub use domain::{DkgSnapshot, GraphSnapshotStore, Snapshot};
