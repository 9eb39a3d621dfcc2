//! Domain ports — interfaces infrastructure implements.
//!
//! Hexagonal architecture: the domain defines the interface, infrastructure
//! provides the concrete implementation. Dependency inversion, not
//! dependency direction.

/// Driven port: somewhere to send non-fatal diagnostics (a stage warning
/// about a malformed line, a fuzzy match that missed). Never raised as an
/// error — see the pipeline error design.
pub trait DiagnosticsSink: Send + Sync {
    fn warn(&self, stage: &str, message: &str);
}

/// The default sink: route every warning through `tracing`.
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn warn(&self, stage: &str, message: &str) {
        tracing::warn!(stage, message);
    }
}
