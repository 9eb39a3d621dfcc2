//! View Builder: abstracts a `DesignGraph` into a `SuperGraph` for a given
//! `(GraphView, ExecutionContext)` pair via the three-phase
//! Promote/Merge/Eliminate algorithm plus an edge rewrite pass.

pub mod domain;

pub use domain::{build_view, ExecutionContext, GraphView, SuperClass, SuperEdge, SuperGraph, SuperNode};
