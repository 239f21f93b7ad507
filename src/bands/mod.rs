//! Band metadata and color ramps
//!
//! Static configuration consumed by the validator and the layer stack.

mod ramps;
mod registry;

pub use ramps::{default_ramps, ColorRamp, ColorRampCatalog, DEFAULT_RAMP};
pub use registry::{sentinel2_bands, Band, BandRegistry};
