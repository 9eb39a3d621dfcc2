//! Design Knowledge Graph construction engine.
//!
//! Feature-first, hexagonal layout: `shared` holds the cross-cutting types
//! every feature imports (`Node`, `Edge`, `Provenance`, the error type);
//! `domain` holds crate-wide ports (diagnostics) and the version/hashing
//! primitives; `features::<name>` holds one pipeline component each, split
//! into `domain` (types + pure logic) and `infrastructure` (parsing/I/O
//! adjacent code); `config` and `pipeline` wire the components together.

pub mod config;
pub mod domain;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use shared::models::{DkgError, DkgResult, ErrorKind};
