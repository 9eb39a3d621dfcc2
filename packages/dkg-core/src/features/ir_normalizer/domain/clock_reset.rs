//! Three-stage clock/reset detection: structural FF-port analysis first,
//! then signal-name heuristics, then FF-input-edge re-confirmation.

use super::ir::Cell;
use crate::shared::utils::{is_active_low, is_clock_name, is_reset_name, ASYNC_RESET_PORTS, SYNC_RESET_PORTS};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct ClockResetSignals {
    pub clocks: BTreeSet<String>,
    pub resets: BTreeSet<String>,
    pub active_low_resets: BTreeSet<String>,
}

/// Stage 1: inspect every FF cell's CLK/ARST*/SRST* ports and record which
/// connected net (by net name, resolved by the caller from bit values) is a
/// clock/reset. `net_of_port_bit` resolves a cell's port connection to the
/// net name that owns it.
pub fn detect_clock_reset_from_ff_cells(
    cells: &[(&str, &Cell)],
    net_of_port_bit: impl Fn(&str, &str) -> Option<String>,
) -> ClockResetSignals {
    let mut signals = ClockResetSignals::default();
    for (cell_id, cell) in cells {
        if !crate::features::ir_normalizer::domain::cell_classification::map_cell_type(&cell.type_)
            .eq(&crate::shared::models::EntityClass::FlipFlop)
        {
            continue;
        }
        for port in cell.connections.keys() {
            let upper = port.to_ascii_uppercase();
            if upper == "CLK" || upper == "CLOCK" {
                if let Some(net) = net_of_port_bit(cell_id, port) {
                    signals.clocks.insert(net);
                }
            } else if ASYNC_RESET_PORTS.contains(&upper.as_str()) {
                if let Some(net) = net_of_port_bit(cell_id, port) {
                    if upper.ends_with('N') {
                        signals.active_low_resets.insert(net.clone());
                    }
                    signals.resets.insert(net);
                }
            } else if SYNC_RESET_PORTS.contains(&upper.as_str()) {
                if let Some(net) = net_of_port_bit(cell_id, port) {
                    if upper.ends_with('N') {
                        signals.active_low_resets.insert(net.clone());
                    }
                    signals.resets.insert(net);
                }
            }
        }
    }
    signals
}

/// Stage 2: for every net name not already classified structurally, fall
/// back to a name heuristic.
pub fn detect_clock_reset_by_name(all_net_names: &[String], structural: &mut ClockResetSignals) {
    for name in all_net_names {
        if structural.clocks.contains(name) || structural.resets.contains(name) {
            continue;
        }
        if is_clock_name(name) {
            structural.clocks.insert(name.clone());
        } else if is_reset_name(name) {
            structural.resets.insert(name.clone());
            if is_active_low(name) {
                structural.active_low_resets.insert(name.clone());
            }
        }
    }
}

/// Combined 3-stage detection: structural, then name-based for anything the
/// structural pass missed. Stage 3 (FF-input-edge re-confirmation) happens
/// once edges exist, in `assign_edge_flow_types`, and only tags edges — it
/// never retracts a net already classified here.
pub fn detect_clock_reset_signals(
    cells: &[(&str, &Cell)],
    all_net_names: &[String],
    net_of_port_bit: impl Fn(&str, &str) -> Option<String>,
) -> ClockResetSignals {
    let mut signals = detect_clock_reset_from_ff_cells(cells, net_of_port_bit);
    detect_clock_reset_by_name(all_net_names, &mut signals);
    signals
}
