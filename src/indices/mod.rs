//! Spectral indices
//!
//! Predefined index catalog and the builder for user-defined indices.

mod builder;
mod catalog;

pub use builder::IndexRequest;
pub use catalog::{predefined_indices, IndexCatalog, IndexDefinition};
