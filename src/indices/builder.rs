//! Custom index builder
//!
//! Turns an operation plus two selected bands into an index layer spec.

use serde::{Deserialize, Serialize};

use crate::bands::{BandRegistry, DEFAULT_RAMP};
use crate::error::{IndexLabError, Result};
use crate::formula::Operation;
use crate::layers::LayerSpec;

/// A user-built index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRequest {
    pub name: String,
    pub operation: Operation,
    /// First band (numerator)
    #[serde(default)]
    pub band_a: Option<String>,
    /// Second band (denominator)
    #[serde(default)]
    pub band_b: Option<String>,
    #[serde(default)]
    pub color_ramp: Option<String>,
}

impl IndexRequest {
    pub fn new(name: impl Into<String>, operation: Operation) -> Self {
        Self {
            name: name.into(),
            operation,
            band_a: None,
            band_b: None,
            color_ramp: None,
        }
    }

    pub fn with_bands(mut self, band_a: impl Into<String>, band_b: impl Into<String>) -> Self {
        self.band_a = Some(band_a.into());
        self.band_b = Some(band_b.into());
        self
    }

    pub fn with_color_ramp(mut self, key: impl Into<String>) -> Self {
        self.color_ramp = Some(key.into());
        self
    }

    /// Build the layer spec
    ///
    /// Generator operations need both bands, and both must be registry
    /// keys. The formula itself is validated when the layer is added.
    pub fn into_spec(self, bands: &BandRegistry) -> Result<LayerSpec> {
        if self.name.trim().is_empty() {
            return Err(IndexLabError::invalid_spec("index name is required"));
        }

        let formula = if self.operation.uses_bands() {
            let (a, b) = match (self.band_a.as_deref(), self.band_b.as_deref()) {
                (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
                _ => {
                    return Err(IndexLabError::invalid_spec(format!(
                        "{} needs two bands",
                        self.operation.kind().label()
                    )))
                }
            };
            for band in [a, b] {
                if !bands.contains(band) {
                    return Err(IndexLabError::UnknownBand {
                        band: band.to_string(),
                    });
                }
            }
            self.operation.formula(a, b)
        } else {
            self.operation.formula("", "")
        };

        let ramp = self.color_ramp.unwrap_or_else(|| DEFAULT_RAMP.to_string());
        Ok(LayerSpec::index(self.name, formula).with_color_ramp(ramp))
    }
}
