//! Band Registry
//!
//! Fixed table of spectral bands and their physical metadata. Built once
//! at startup, read-only afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ramps::is_hex_color;
use crate::error::{IndexLabError, Result};
use crate::formula::{is_band_token, validate, ValidationResult};

/// A named spectral channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Band identifier used in formulas (e.g., "B8", "B8A")
    pub id: String,
    /// Common name (e.g., "NIR")
    pub name: String,
    /// Central wavelength in nanometres
    pub wavelength_nm: f64,
    /// Spatial resolution in metres
    pub resolution_m: f64,
    /// Display color as `#RRGGBB`
    pub display_color: String,
}

impl Band {
    pub fn new(
        id: &str,
        name: &str,
        wavelength_nm: f64,
        resolution_m: f64,
        display_color: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            wavelength_nm,
            resolution_m,
            display_color: display_color.to_string(),
        }
    }
}

/// Registry of known bands, in catalog order
#[derive(Debug, Clone)]
pub struct BandRegistry {
    bands: Vec<Band>,
}

impl BandRegistry {
    /// Build a registry, rejecting duplicate or malformed entries
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        if bands.is_empty() {
            return Err(IndexLabError::config("band registry is empty"));
        }

        let mut seen = BTreeSet::new();
        for band in &bands {
            if !is_band_token(&band.id) {
                return Err(IndexLabError::config(format!(
                    "band id '{}' is not a valid band reference",
                    band.id
                )));
            }
            if !seen.insert(band.id.as_str()) {
                return Err(IndexLabError::config(format!(
                    "duplicate band id '{}'",
                    band.id
                )));
            }
            if !is_hex_color(&band.display_color) {
                return Err(IndexLabError::config(format!(
                    "band '{}' has invalid display color '{}'",
                    band.id, band.display_color
                )));
            }
            if band.wavelength_nm <= 0.0 || band.resolution_m <= 0.0 {
                return Err(IndexLabError::config(format!(
                    "band '{}' needs a positive wavelength and resolution",
                    band.id
                )));
            }
        }

        Ok(Self { bands })
    }

    /// Sentinel-2 MSI bands
    pub fn sentinel2() -> Result<Self> {
        Self::new(sentinel2_bands())
    }

    /// Get a band by id
    pub fn get(&self, id: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// Check if a band id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All registered band ids
    pub fn ids(&self) -> BTreeSet<String> {
        self.bands.iter().map(|b| b.id.clone()).collect()
    }

    /// Iterate bands in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Validate a formula against every registered band
    pub fn validate(&self, formula: &str) -> ValidationResult {
        validate(formula, &self.ids())
    }
}

/// The 13 Sentinel-2 MSI bands
pub fn sentinel2_bands() -> Vec<Band> {
    vec![
        Band::new("B1", "Coastal aerosol", 443.0, 60.0, "#6B46C1"),
        Band::new("B2", "Blue", 490.0, 10.0, "#2563EB"),
        Band::new("B3", "Green", 560.0, 10.0, "#16A34A"),
        Band::new("B4", "Red", 665.0, 10.0, "#DC2626"),
        Band::new("B5", "Red Edge 1", 705.0, 20.0, "#EA580C"),
        Band::new("B6", "Red Edge 2", 740.0, 20.0, "#D97706"),
        Band::new("B7", "Red Edge 3", 783.0, 20.0, "#CA8A04"),
        Band::new("B8", "NIR", 842.0, 10.0, "#B91C1C"),
        Band::new("B8A", "Narrow NIR", 865.0, 20.0, "#991B1B"),
        Band::new("B9", "Water vapour", 945.0, 60.0, "#1E40AF"),
        Band::new("B10", "SWIR - Cirrus", 1375.0, 60.0, "#7C3AED"),
        Band::new("B11", "SWIR 1", 1610.0, 20.0, "#A21CAF"),
        Band::new("B12", "SWIR 2", 2190.0, 20.0, "#BE185D"),
    ]
}
