//! Port for snapshot persistence. Implemented by the `dkg-storage` crate;
//! the core pipeline depends only on this trait.

use super::model::Snapshot;
use crate::shared::models::DkgResult;

pub trait GraphSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> DkgResult<()>;
    fn load(&self) -> DkgResult<Snapshot>;
}
