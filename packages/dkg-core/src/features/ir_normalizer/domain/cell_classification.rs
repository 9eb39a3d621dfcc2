//! Maps a raw cell `type` string onto the closed `EntityClass` vocabulary.
//!
//! The literal netlist-normalizer algorithm only ever distinguishes
//! FlipFlop/MUX cells from everything else (which defaults to RTLBlock) —
//! `$`-prefixed generic primitives are the pre-technology-mapping shape a
//! synthesis front-end emits. A *post*-technology-mapping netlist also
//! carries concrete LUT/DSP/BRAM primitives and submodule instantiations,
//! which this mapping additionally recognizes by cell-type name so the full
//! `EntityClass` vocabulary is reachable from real ingestion, not only from
//! view-builder test fixtures.

use crate::shared::models::EntityClass;
use crate::shared::utils::is_ff_cell;

const MUX_CELL_TYPES: &[&str] = &["$mux", "$pmux"];

/// Cell types whose name does not start with `$` are either a
/// technology-mapped primitive (LUT/DSP/BRAM, recognized by name) or an
/// instantiated submodule (everything else that isn't `$`-prefixed).
pub fn map_cell_type(cell_type: &str) -> EntityClass {
    if is_ff_cell(cell_type) {
        return EntityClass::FlipFlop;
    }
    if MUX_CELL_TYPES.contains(&cell_type) {
        return EntityClass::Mux;
    }
    if cell_type.starts_with('$') {
        return EntityClass::RtlBlock;
    }
    let upper = cell_type.to_ascii_uppercase();
    if upper.contains("LUT") {
        EntityClass::Lut
    } else if upper.contains("DSP") {
        EntityClass::Dsp
    } else if upper.contains("BRAM") || upper.contains("RAMB") {
        EntityClass::Bram
    } else {
        EntityClass::ModuleInstance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ff_cells_map_to_flip_flop() {
        assert_eq!(map_cell_type("$dff"), EntityClass::FlipFlop);
        assert_eq!(map_cell_type("$sdffe"), EntityClass::FlipFlop);
    }

    #[test]
    fn mux_cells_map_to_mux() {
        assert_eq!(map_cell_type("$mux"), EntityClass::Mux);
        assert_eq!(map_cell_type("$pmux"), EntityClass::Mux);
    }

    #[test]
    fn generic_dollar_prefixed_primitives_are_rtl_block() {
        assert_eq!(map_cell_type("$and"), EntityClass::RtlBlock);
        assert_eq!(map_cell_type("$add"), EntityClass::RtlBlock);
        assert_eq!(map_cell_type("$dlatch"), EntityClass::RtlBlock);
    }

    #[test]
    fn technology_mapped_primitives_are_recognized_by_name() {
        assert_eq!(map_cell_type("LUT4"), EntityClass::Lut);
        assert_eq!(map_cell_type("DSP48E1"), EntityClass::Dsp);
        assert_eq!(map_cell_type("RAMB36E1"), EntityClass::Bram);
    }

    #[test]
    fn other_library_instances_are_module_instances() {
        assert_eq!(map_cell_type("sky130_fd_sc_hd__inv_1"), EntityClass::ModuleInstance);
    }
}
