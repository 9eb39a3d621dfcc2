pub mod apply;
pub mod path;

pub use apply::apply_to_graph;
pub use path::{TimingPath, TimingStage};
