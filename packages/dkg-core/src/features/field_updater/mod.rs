pub mod domain;

pub use domain::GraphUpdater;
