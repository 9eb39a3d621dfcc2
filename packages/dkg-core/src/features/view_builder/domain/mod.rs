pub mod builder;
pub mod policy;
pub mod supergraph;

pub use builder::{build_view, ViewBuilder};
pub use policy::resolve_policy;
pub use supergraph::{
    ExecutionContext, GraphView, NodeAction, NodePolicy, SuperClass, SuperEdge, SuperEdgeId, SuperGraph, SuperNode, SuperNodeId,
};
