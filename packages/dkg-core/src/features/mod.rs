//! Every pipeline component, leaves first in the dependency order from
//! §2's component table: identity and field updating underpin everything
//! else; IR normalization builds the base graph; constraint projection and
//! timing ingestion enrich it; the view builder abstracts it; the analysis
//! aggregator and query engine read the result; snapshot persists it.

pub mod analysis_aggregator;
pub mod constraint_projector;
pub mod field_updater;
pub mod identity;
pub mod ir_normalizer;
pub mod query_engine;
pub mod snapshot;
pub mod timing_ingestor;
pub mod view_builder;
