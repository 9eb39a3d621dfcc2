//! Signal-name and cell-type heuristics used by structural detection when a
//! netlist carries no explicit clock/reset port metadata.

use regex::Regex;
use std::sync::OnceLock;

const CLOCK_HINTS: &[&str] = &["clk", "clock", "ck"];
const RESET_HINTS: &[&str] = &["rst", "reset", "rstn", "rst_n", "resetn"];

pub fn is_clock_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    CLOCK_HINTS.iter().any(|hint| lower.contains(hint))
}

pub fn is_reset_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESET_HINTS.iter().any(|hint| lower.contains(hint))
}

/// A reset/enable signal is conventionally active-low if it ends in `_n`,
/// `n`, or `b` (bar) directly after a reset hint, e.g. `rst_n`, `rstn`.
pub fn is_active_low(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with("_n") || lower.ends_with("_b") || (lower.ends_with('n') && is_reset_name(&lower))
}

const FF_CELL_TYPES: &[&str] = &["$dff", "$adff", "$sdff", "$dffe", "$sdffe", "$aldff", "$aldffe"];

pub fn is_ff_cell(cell_type: &str) -> bool {
    FF_CELL_TYPES.contains(&cell_type)
}

pub const ASYNC_RESET_PORTS: &[&str] = &["ARST", "ARST_N", "NRST", "NRESET"];
pub const SYNC_RESET_PORTS: &[&str] = &["SRST", "SRST_N", "SR", "R", "RST"];

fn bit_index_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\[(\d+)\]$").unwrap())
}

/// Splits `"bus[3]"` into `("bus", Some(3))`; a name with no trailing
/// `[N]` passes through as `(name, None)`.
pub fn split_signal_bit(name: &str) -> (String, Option<u32>) {
    match bit_index_re().captures(name) {
        Some(caps) => {
            let base = caps.get(1).unwrap().as_str().to_string();
            let bit: u32 = caps.get(2).unwrap().as_str().parse().unwrap_or(0);
            (base, Some(bit))
        }
        None => (name.to_string(), None),
    }
}
