//! Constraint Projector: applies SDC/XDC/TCL/BD constraint files onto a
//! `DesignGraph`. Dialect is selected by file extension; an unrecognized
//! extension is a caller-visible `DkgError`, unlike unrecognized *commands*
//! within a recognized dialect, which are only ever a diagnostic.

pub mod domain;
pub mod infrastructure;

use crate::domain::ports::DiagnosticsSink;
use crate::features::identity::pattern_cache::PatternCache;
use crate::shared::models::{DesignGraph, DkgError, DkgResult};

/// Applies `content` (the text of `path`) onto `graph`, dispatching on
/// `path`'s extension.
pub fn project_constraint_file(
    path: &str,
    content: &str,
    graph: &mut DesignGraph,
    cache: &PatternCache,
    diagnostics: &dyn DiagnosticsSink,
) -> DkgResult<()> {
    let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "sdc" => infrastructure::sdc_parser::parse_and_update(content, graph, cache, diagnostics, Some(path)),
        "xdc" => infrastructure::xdc_parser::parse_and_update(content, graph, cache, diagnostics, Some(path)),
        "tcl" => infrastructure::tcl_parser::parse_and_update(content, graph, cache, diagnostics, Some(path)),
        "bd" => infrastructure::bd_parser::parse_and_update(content, graph, cache, diagnostics, Some(path)),
        other => return Err(DkgError::constraint(format!("unsupported constraint file extension: .{other}")).with_file(path)),
    }
    Ok(())
}
