//! The in-memory shape of a persisted snapshot. `dkg-storage` serializes
//! this to the textual object format; the core never reads or writes files
//! itself.

use crate::domain::version::Version;
use crate::features::view_builder::domain::supergraph::SuperGraph;
use crate::shared::models::{DesignGraph, Edge, Node};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: Version,
    pub dkg: DkgSnapshot,
    pub supergraph: Option<SuperGraph>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DkgSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn from_graph(graph: &DesignGraph, version: Version, supergraph: Option<SuperGraph>) -> Self {
        Self {
            version,
            dkg: DkgSnapshot {
                nodes: graph.nodes.values().cloned().collect(),
                edges: graph.edges.values().cloned().collect(),
            },
            supergraph,
        }
    }

    pub fn into_graph(self) -> DesignGraph {
        let mut graph = DesignGraph::new();
        for node in self.dkg.nodes {
            graph.insert_node(node);
        }
        for edge in self.dkg.edges {
            graph.insert_edge(edge);
        }
        graph
    }
}
