pub mod ids;
pub mod pattern_cache;

pub use ids::SignatureBuilder;
pub use pattern_cache::PatternCache;
