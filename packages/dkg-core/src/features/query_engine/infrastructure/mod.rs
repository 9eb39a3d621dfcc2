pub mod traversal_engine;

pub use traversal_engine::TraversalEngine;
