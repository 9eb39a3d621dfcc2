//! Small, dependency-free helpers shared across features.

mod naming;
mod src_loc;

pub use naming::{is_active_low, is_clock_name, is_ff_cell, is_reset_name, split_signal_bit};
pub use src_loc::parse_src;
