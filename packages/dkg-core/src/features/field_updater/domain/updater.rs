//! The monotonic field-source updater: the single place where any stage
//! after IR normalization is allowed to mutate a node/edge field. Every
//! write goes through the priority lattice in `shared::models::field_source`.

use crate::shared::models::{DesignGraph, FieldSource, ParsingStage};
use serde_json::Value;

pub struct GraphUpdater<'a> {
    graph: &'a mut DesignGraph,
}

impl<'a> GraphUpdater<'a> {
    pub fn new(graph: &'a mut DesignGraph) -> Self {
        Self { graph }
    }

    /// Updates a node's field via `setter` if the priority lattice accepts
    /// the write. Returns whether the write happened.
    pub fn update_node_field(
        &mut self,
        node_id: &str,
        field_name: &str,
        source: FieldSource,
        stage: ParsingStage,
        origin_file: Option<String>,
        origin_line: Option<u32>,
        setter: impl FnOnce(&mut crate::shared::models::Node),
    ) -> bool {
        let Some(node) = self.graph.nodes.get_mut(node_id) else {
            return false;
        };
        if !node.metadata.should_update(field_name, source) {
            return false;
        }
        setter(node);
        node.metadata.set(field_name, source, stage, origin_file, origin_line);
        true
    }

    pub fn update_edge_field(
        &mut self,
        edge_id: &str,
        field_name: &str,
        source: FieldSource,
        stage: ParsingStage,
        origin_file: Option<String>,
        origin_line: Option<u32>,
        setter: impl FnOnce(&mut crate::shared::models::Edge),
    ) -> bool {
        let Some(edge) = self.graph.edges.get_mut(edge_id) else {
            return false;
        };
        if !edge.metadata.should_update(field_name, source) {
            return false;
        }
        setter(edge);
        edge.metadata.set(field_name, source, stage, origin_file, origin_line);
        true
    }

    /// Whole-field-granularity attribute write (the constraint projector
    /// replaces an `attributes` entry outright, it does not merge into a
    /// nested structure).
    pub fn update_node_attribute(
        &mut self,
        node_id: &str,
        key: &str,
        value: Value,
        source: FieldSource,
        stage: ParsingStage,
        origin_file: Option<String>,
        origin_line: Option<u32>,
    ) -> bool {
        let field_name = format!("attributes.{key}");
        self.update_node_field(node_id, &field_name, source, stage, origin_file, origin_line, |node| {
            node.attributes.insert(key.to_string(), value);
        })
    }

    pub fn batch_update_clock_domains(
        &mut self,
        assignments: impl IntoIterator<Item = (String, String)>,
        source: FieldSource,
        stage: ParsingStage,
    ) -> usize {
        let mut count = 0;
        for (node_id, clock_domain) in assignments {
            let updated = self.update_node_field(&node_id, "clock_domain", source, stage, None, None, |node| {
                node.clock_domain = Some(clock_domain.clone());
            });
            if updated {
                count += 1;
            }
        }
        count
    }
}
