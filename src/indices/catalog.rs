//! Index Catalog
//!
//! Read-only table of predefined spectral indices. Every entry is checked
//! when the catalog is built: its formula must validate against its own
//! band list, and that list must come from the band registry.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::bands::{BandRegistry, ColorRampCatalog};
use crate::error::{IndexLabError, Result};
use crate::formula::validate;
use crate::layers::{Layer, LayerSpec, LayerStack};

/// A predefined index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Catalog key (e.g., "NDVI")
    pub name: String,
    pub description: String,
    /// Canonical formula
    pub formula: String,
    /// Bands the formula reads
    pub bands_used: Vec<String>,
    /// Expected (min, max) of the computed value
    pub value_range: (f64, f64),
    /// Color ramp key
    pub color_ramp: String,
}

impl IndexDefinition {
    pub fn new(
        name: &str,
        description: &str,
        formula: &str,
        bands_used: &[&str],
        value_range: (f64, f64),
        color_ramp: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            formula: formula.to_string(),
            bands_used: bands_used.iter().map(|b| b.to_string()).collect(),
            value_range,
            color_ramp: color_ramp.to_string(),
        }
    }

    /// Layer name for an instance computed on `date`
    pub fn layer_name(&self, date: NaiveDate) -> String {
        format!("{} - {}", self.name, date.format("%Y-%m-%d"))
    }

    fn check(&self, bands: &BandRegistry, ramps: &ColorRampCatalog) -> Result<()> {
        let fail = |reason: String| IndexLabError::config(format!("index '{}': {}", self.name, reason));

        if self.name.trim().is_empty() {
            return Err(IndexLabError::config("index with an empty name"));
        }
        if self.bands_used.is_empty() {
            return Err(fail("no bands listed".to_string()));
        }
        if let Some(unknown) = self.bands_used.iter().find(|b| !bands.contains(b)) {
            return Err(fail(format!("band '{}' is not in the registry", unknown)));
        }

        let declared: BTreeSet<String> = self.bands_used.iter().cloned().collect();
        let result = validate(&self.formula, &declared);
        if !result.is_valid {
            let errors: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
            return Err(fail(format!("invalid formula: {}", errors.join("; "))));
        }
        if result.used_bands != declared {
            return Err(fail("formula does not use every listed band".to_string()));
        }

        let (min, max) = self.value_range;
        // NaN bounds compare as None and are rejected too
        if min.partial_cmp(&max) != Some(Ordering::Less) {
            return Err(fail(format!("empty value range ({}, {})", min, max)));
        }
        if !ramps.contains(&self.color_ramp) {
            return Err(fail(format!("unknown color ramp '{}'", self.color_ramp)));
        }
        Ok(())
    }
}

/// Catalog of predefined indices, in display order
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    indices: Vec<IndexDefinition>,
}

impl IndexCatalog {
    pub fn new(
        indices: Vec<IndexDefinition>,
        bands: &BandRegistry,
        ramps: &ColorRampCatalog,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for index in &indices {
            index.check(bands, ramps)?;
            if !seen.insert(index.name.as_str()) {
                return Err(IndexLabError::config(format!(
                    "duplicate index '{}'",
                    index.name
                )));
            }
        }
        Ok(Self { indices })
    }

    /// Catalog of the reference deployment
    pub fn predefined(bands: &BandRegistry, ramps: &ColorRampCatalog) -> Result<Self> {
        Self::new(predefined_indices(), bands, ramps)
    }

    pub fn list_indices(&self) -> &[IndexDefinition] {
        &self.indices
    }

    pub fn get(&self, name: &str) -> Option<&IndexDefinition> {
        self.indices.iter().find(|i| i.name == name)
    }

    /// Look up an index, failing with `UnknownIndex` and the valid names
    pub fn require(&self, name: &str) -> Result<&IndexDefinition> {
        self.get(name).ok_or_else(|| IndexLabError::UnknownIndex {
            name: name.to_string(),
            available: self.names(),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.indices.iter().map(|i| i.name.clone()).collect()
    }

    /// Layer spec copying the entry's formula and ramp
    pub fn layer_spec(&self, name: &str, date: NaiveDate) -> Result<LayerSpec> {
        let index = self.require(name)?;
        Ok(LayerSpec::index(index.layer_name(date), index.formula.clone())
            .with_color_ramp(index.color_ramp.clone()))
    }

    /// Add a fresh layer for `name` to `stack`
    ///
    /// The layer gets the stack's next id and today's date in its name.
    pub fn instantiate_layer(&self, name: &str, stack: &mut LayerStack) -> Result<Layer> {
        let spec = self.layer_spec(name, Utc::now().date_naive())?;
        let layer = stack.add_layer(spec)?;
        info!("Instantiated index {} as layer {}", name, layer.id);
        Ok(layer)
    }
}

/// NDVI, NDWI, MSAVI, SAVI, EVI and NDMI for Sentinel-2
pub fn predefined_indices() -> Vec<IndexDefinition> {
    vec![
        IndexDefinition::new(
            "NDVI",
            "Normalized Difference Vegetation Index",
            "(B8 - B4) / (B8 + B4)",
            &["B8", "B4"],
            (-1.0, 1.0),
            "vegetation",
        ),
        IndexDefinition::new(
            "NDWI",
            "Normalized Difference Water Index",
            "(B3 - B8) / (B3 + B8)",
            &["B3", "B8"],
            (-1.0, 1.0),
            "water",
        ),
        // squared by multiplication: `^` is not part of the formula alphabet
        IndexDefinition::new(
            "MSAVI",
            "Modified Soil-Adjusted Vegetation Index",
            "(2 * B8 + 1 - sqrt((2 * B8 + 1) * (2 * B8 + 1) - 8 * (B8 - B4))) / 2",
            &["B8", "B4"],
            (-1.0, 1.0),
            "vegetation",
        ),
        IndexDefinition::new(
            "SAVI",
            "Soil-Adjusted Vegetation Index",
            "((B8 - B4) / (B8 + B4 + 0.5)) * 1.5",
            &["B8", "B4"],
            (-1.0, 1.0),
            "vegetation",
        ),
        IndexDefinition::new(
            "EVI",
            "Enhanced Vegetation Index",
            "2.5 * ((B8 - B4) / (B8 + 6 * B4 - 7.5 * B2 + 1))",
            &["B8", "B4", "B2"],
            (-1.0, 1.0),
            "vegetation",
        ),
        IndexDefinition::new(
            "NDMI",
            "Normalized Difference Moisture Index",
            "(B8 - B11) / (B8 + B11)",
            &["B8", "B11"],
            (-1.0, 1.0),
            "moisture",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn catalogs() -> (BandRegistry, ColorRampCatalog) {
        (
            BandRegistry::sentinel2().unwrap(),
            ColorRampCatalog::defaults().unwrap(),
        )
    }

    #[test]
    fn test_predefined_catalog_validates() {
        let (bands, ramps) = catalogs();
        let catalog = IndexCatalog::predefined(&bands, &ramps).unwrap();
        assert_eq!(
            catalog.names(),
            vec!["NDVI", "NDWI", "MSAVI", "SAVI", "EVI", "NDMI"]
        );
        for index in catalog.list_indices() {
            assert!(bands.validate(&index.formula).is_valid, "{}", index.name);
        }
    }

    #[test]
    fn test_unknown_index_lists_names() {
        let (bands, ramps) = catalogs();
        let catalog = IndexCatalog::predefined(&bands, &ramps).unwrap();
        match catalog.require("GNDVI") {
            Err(IndexLabError::UnknownIndex { name, available }) => {
                assert_eq!(name, "GNDVI");
                assert_eq!(available.len(), 6);
            }
            other => panic!("expected UnknownIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_band_outside_registry_rejected() {
        let (bands, ramps) = catalogs();
        let bad = IndexDefinition::new("X", "x", "B8 - B13", &["B8", "B13"], (-1.0, 1.0), "RdYlGn");
        assert!(matches!(
            IndexCatalog::new(vec![bad], &bands, &ramps),
            Err(IndexLabError::Config { .. })
        ));
    }

    #[test]
    fn test_formula_using_undeclared_band_rejected() {
        let (bands, ramps) = catalogs();
        let bad = IndexDefinition::new("X", "x", "B8 - B4", &["B8"], (-1.0, 1.0), "RdYlGn");
        assert!(IndexCatalog::new(vec![bad], &bands, &ramps).is_err());
    }

    #[test]
    fn test_empty_or_nan_value_range_rejected() {
        let (bands, ramps) = catalogs();
        for range in [(1.0, 1.0), (1.0, -1.0), (f64::NAN, 1.0)] {
            let bad = IndexDefinition::new("X", "x", "B8 - B4", &["B8", "B4"], range, "RdYlGn");
            assert!(
                matches!(
                    IndexCatalog::new(vec![bad], &bands, &ramps),
                    Err(IndexLabError::Config { .. })
                ),
                "{:?}",
                range
            );
        }
    }

    #[test]
    fn test_layer_spec_naming() {
        let (bands, ramps) = catalogs();
        let catalog = IndexCatalog::predefined(&bands, &ramps).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();

        let spec = catalog.layer_spec("NDVI", date).unwrap();
        assert_eq!(spec.name, "NDVI - 2025-08-20");
        assert_eq!(spec.formula.as_deref(), Some("(B8 - B4) / (B8 + B4)"));
        assert_eq!(spec.color_ramp.as_deref(), Some("vegetation"));
    }

    #[test]
    fn test_instantiate_layer_uses_stack_ids() {
        let (bands, ramps) = catalogs();
        let catalog = IndexCatalog::predefined(&bands, &ramps).unwrap();
        let mut stack = LayerStack::new(Arc::new(bands), Arc::new(ramps));

        let first = catalog.instantiate_layer("NDVI", &mut stack).unwrap();
        let second = catalog.instantiate_layer("NDMI", &mut stack).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert!(second.name.starts_with("NDMI - "));

        assert!(catalog.instantiate_layer("NOPE", &mut stack).is_err());
        assert_eq!(stack.len(), 2);
    }
}
