pub mod builder;
pub mod bus_coalesce;
pub mod cell_classification;
pub mod clock_reset;
pub mod edge_flow;
pub mod ir;

pub use builder::build_nodes_and_edges;
pub use ir::{Bit, Cell, Direction, Module, NetlistDocument, Netname};
