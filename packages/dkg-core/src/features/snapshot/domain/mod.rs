pub mod model;
pub mod ports;

pub use model::{DkgSnapshot, Snapshot};
pub use ports::GraphSnapshotStore;
