//! The static `(context, view, entity_class) -> NodePolicy` table plus the
//! context-sensitive overrides layered on top of it. Grounded on the
//! original `VIEW_POLICY` table, extended with a `Physical` view (absent
//! there) and `ExecutionContext` overrides (also absent there — the
//! original has no notion of a testbench/clk_gen execution context).

use super::supergraph::{ExecutionContext, GraphView, NodeAction, NodePolicy, SuperClass};
use crate::shared::models::{EntityClass, Node};
use std::collections::BTreeMap;

/// `attributes["is_initial_construct"]` flags a node as an `initial`/
/// power-on construct (clock/reset generation scaffolding synthesized for
/// simulation only) — the "initial construct" condition §4.7 names
/// alongside the `clk_gen`/`reset_gen` naming heuristic.
pub fn is_initial_construct(attributes: &BTreeMap<String, serde_json::Value>) -> bool {
    attributes.get("is_initial_construct").and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Convenience wrapper over `resolve_policy` for call sites holding a
/// `Node` rather than its individual fields.
pub fn resolve_node_policy(context: ExecutionContext, view: GraphView, node: &Node) -> NodePolicy {
    resolve_policy(
        context,
        view,
        node.entity_class,
        &node.local_name,
        &node.hier_path,
        is_initial_construct(&node.attributes),
    )
}

/// Base policy before any context override, per view.
fn base_policy(view: GraphView, entity_class: EntityClass) -> Option<NodePolicy> {
    use EntityClass::*;
    match view {
        GraphView::Structural => match entity_class {
            ModuleInstance => Some(NodePolicy::promote()),
            FlipFlop | Lut | Mux | Dsp | Bram => Some(NodePolicy::merge(SuperClass::CombinationalCloud)),
            IoPort => Some(NodePolicy::promote()),
            PackagePin | Pblock => Some(NodePolicy::eliminate()),
            Fsm => Some(NodePolicy::promote()),
            RtlBlock => Some(NodePolicy::merge(SuperClass::CombinationalCloud)),
            BoardConnector => Some(NodePolicy::eliminate()),
        },
        GraphView::Connectivity => match entity_class {
            FlipFlop | Dsp | Bram => Some(NodePolicy::promote()),
            Lut | Mux | RtlBlock => Some(NodePolicy::merge(SuperClass::CombinationalCloud)),
            ModuleInstance => Some(NodePolicy::eliminate()),
            IoPort => Some(NodePolicy::promote()),
            Fsm => Some(NodePolicy::promote()),
            PackagePin | Pblock | BoardConnector => Some(NodePolicy::eliminate()),
        },
        // No teacher/original precedent for a Physical view policy table —
        // filled in analogously to Structural/Connectivity: constraint-
        // carrying placement entities cluster around ConstraintGroup,
        // I/O pins stay individually visible, ordinary logic merges into
        // module-level clusters.
        GraphView::Physical => match entity_class {
            PackagePin | Pblock | BoardConnector => Some(NodePolicy::merge(SuperClass::ConstraintGroup)),
            ModuleInstance => Some(NodePolicy::merge(SuperClass::ModuleCluster)),
            FlipFlop | Lut | Mux | Dsp | Bram | RtlBlock => Some(NodePolicy::merge(SuperClass::ModuleCluster)),
            IoPort => Some(NodePolicy::promote()),
            Fsm => Some(NodePolicy::eliminate()),
        },
    }
}

/// Applies `ExecutionContext` overrides on top of `base_policy`. Two
/// overrides exist today: in `Design` context, nodes whose local name
/// *begins* `tb_` or whose `hier_path` *contains* `testbench`/`sim` are
/// always eliminated regardless of view policy; in `Simulation` context,
/// nodes whose local name *starts* `clk_gen`/`reset_gen` (or are flagged as
/// an initial construct via `attributes["is_initial_construct"]`) are
/// always promoted so they stay individually visible (they'd otherwise
/// merge away as ordinary RTL blocks).
pub fn resolve_policy(
    context: ExecutionContext,
    view: GraphView,
    entity_class: EntityClass,
    local_name: &str,
    hier_path: &str,
    is_initial_construct: bool,
) -> NodePolicy {
    let lower_local = local_name.to_ascii_lowercase();
    let lower_hier = hier_path.to_ascii_lowercase();
    let is_testbench =
        lower_local.starts_with("tb_") || lower_hier.contains("testbench") || lower_hier.contains("sim");
    let is_clk_or_reset_gen =
        lower_local.starts_with("clk_gen") || lower_local.starts_with("reset_gen") || is_initial_construct;

    match context {
        ExecutionContext::Design if is_testbench => NodePolicy::eliminate(),
        ExecutionContext::Simulation if is_clk_or_reset_gen => NodePolicy::promote(),
        _ => base_policy(view, entity_class).unwrap_or_else(NodePolicy::eliminate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tb_prefixed_local_name_is_eliminated_in_design_context() {
        let policy = resolve_policy(ExecutionContext::Design, GraphView::Structural, EntityClass::ModuleInstance, "tb_top", "top", false);
        assert_eq!(policy.action, NodeAction::Eliminate);
    }

    #[test]
    fn local_name_merely_containing_tb_is_not_eliminated() {
        // Anchored begins-with, not a substring match: "stb_mod" contains
        // "tb_" but does not begin with it.
        let policy =
            resolve_policy(ExecutionContext::Design, GraphView::Structural, EntityClass::ModuleInstance, "stb_mod", "top", false);
        assert_eq!(policy.action, NodeAction::Promote);
    }

    #[test]
    fn hier_path_containing_testbench_is_eliminated_in_design_context() {
        let policy = resolve_policy(
            ExecutionContext::Design,
            GraphView::Structural,
            EntityClass::ModuleInstance,
            "u_core",
            "top/testbench/u_core",
            false,
        );
        assert_eq!(policy.action, NodeAction::Eliminate);
    }

    #[test]
    fn hier_path_containing_sim_is_eliminated_in_design_context() {
        let policy = resolve_policy(
            ExecutionContext::Design,
            GraphView::Structural,
            EntityClass::ModuleInstance,
            "u_core",
            "top/sim/u_core",
            false,
        );
        assert_eq!(policy.action, NodeAction::Eliminate);
    }

    #[test]
    fn clk_gen_is_promoted_in_simulation_context() {
        let policy =
            resolve_policy(ExecutionContext::Simulation, GraphView::Structural, EntityClass::RtlBlock, "clk_gen_0", "top", false);
        assert_eq!(policy.action, NodeAction::Promote);
    }

    #[test]
    fn initial_construct_attribute_is_promoted_in_simulation_context() {
        let policy =
            resolve_policy(ExecutionContext::Simulation, GraphView::Structural, EntityClass::RtlBlock, "u_init", "top", true);
        assert_eq!(policy.action, NodeAction::Promote);
    }

    #[test]
    fn module_instance_promotes_in_structural_view_by_default() {
        let policy = resolve_policy(ExecutionContext::Design, GraphView::Structural, EntityClass::ModuleInstance, "u_core", "top", false);
        assert_eq!(policy.action, NodeAction::Promote);
    }

    #[test]
    fn flip_flop_merges_as_combinational_cloud_in_structural_view() {
        let policy = resolve_policy(ExecutionContext::Design, GraphView::Structural, EntityClass::FlipFlop, "ff0", "top", false);
        assert_eq!(policy.action, NodeAction::Merge);
        assert_eq!(policy.merge_class, Some(SuperClass::CombinationalCloud));
    }

    #[test]
    fn package_pin_merges_into_constraint_group_in_physical_view() {
        let policy =
            resolve_policy(ExecutionContext::Design, GraphView::Physical, EntityClass::PackagePin, "pin_aa4", "top", false);
        assert_eq!(policy.action, NodeAction::Merge);
        assert_eq!(policy.merge_class, Some(SuperClass::ConstraintGroup));
    }
}
