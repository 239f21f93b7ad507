//! Layer Composition Module
//!
//! - Layer entities (raster imagery or computed index)
//! - The ordered layer stack with visibility and lifecycle operations

mod layer;
mod stack;

pub use layer::{Layer, LayerKind, LayerSpec};
pub use stack::{LayerStack, LayerStackState, FIRST_LAYER_ID};
