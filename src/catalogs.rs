//! Immutable reference data shared by every session

use std::sync::Arc;

use crate::bands::{BandRegistry, ColorRampCatalog};
use crate::error::Result;
use crate::indices::IndexCatalog;
use crate::layers::LayerStack;

/// Bands, color ramps and predefined indices, validated together
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub bands: Arc<BandRegistry>,
    pub ramps: Arc<ColorRampCatalog>,
    pub indices: IndexCatalog,
}

impl Catalogs {
    /// Bundle catalogs that were validated against each other
    pub fn new(bands: BandRegistry, ramps: ColorRampCatalog, indices: IndexCatalog) -> Self {
        Self {
            bands: Arc::new(bands),
            ramps: Arc::new(ramps),
            indices,
        }
    }

    /// Sentinel-2 bands, the default ramps and the six predefined indices
    pub fn defaults() -> Result<Self> {
        let bands = BandRegistry::sentinel2()?;
        let ramps = ColorRampCatalog::defaults()?;
        let indices = IndexCatalog::predefined(&bands, &ramps)?;
        Ok(Self::new(bands, ramps, indices))
    }

    /// Empty stack bound to these catalogs
    pub fn new_stack(&self) -> LayerStack {
        LayerStack::new(Arc::clone(&self.bands), Arc::clone(&self.ramps))
    }
}
