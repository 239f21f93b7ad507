//! Color ramps
//!
//! Ordered palettes used to render an index value range.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{IndexLabError, Result};

/// Default ramp for user-built indices
pub const DEFAULT_RAMP: &str = "RdYlGn";

/// An ordered palette, low values first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub key: String,
    pub colors: Vec<String>,
}

impl ColorRamp {
    pub fn new(key: &str, colors: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Catalog of color ramps keyed by name
#[derive(Debug, Clone)]
pub struct ColorRampCatalog {
    ramps: Vec<ColorRamp>,
}

impl ColorRampCatalog {
    pub fn new(ramps: Vec<ColorRamp>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for ramp in &ramps {
            if !seen.insert(ramp.key.as_str()) {
                return Err(IndexLabError::config(format!(
                    "duplicate color ramp '{}'",
                    ramp.key
                )));
            }
            if ramp.colors.len() < 2 {
                return Err(IndexLabError::config(format!(
                    "color ramp '{}' needs at least two colors",
                    ramp.key
                )));
            }
            if let Some(bad) = ramp.colors.iter().find(|c| !is_hex_color(c)) {
                return Err(IndexLabError::config(format!(
                    "color ramp '{}' has invalid color '{}'",
                    ramp.key, bad
                )));
            }
        }
        Ok(Self { ramps })
    }

    /// Built-in palettes
    pub fn defaults() -> Result<Self> {
        Self::new(default_ramps())
    }

    pub fn get(&self, key: &str) -> Option<&ColorRamp> {
        self.ramps.iter().find(|r| r.key == key)
    }

    /// Look up a ramp, failing with `UnknownColorRamp`
    pub fn require(&self, key: &str) -> Result<&ColorRamp> {
        self.get(key).ok_or_else(|| IndexLabError::UnknownColorRamp {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.ramps.iter().map(|r| r.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorRamp> {
        self.ramps.iter()
    }
}

/// `#RRGGBB`
pub(crate) fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

const RD_YL_GN: &[&str] = &[
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
    "#66bd63", "#1a9850", "#006837",
];
const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];
const YL_GN: &[&str] = &[
    "#ffffe5", "#f7fcb9", "#d9f0a3", "#addd8e", "#78c679", "#41ab5d", "#238443", "#006837",
    "#004529",
];
const BR_BG: &[&str] = &[
    "#543005", "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#f5f5f5", "#c7eae5", "#80cdc1",
    "#35978f", "#01665e", "#003c30",
];
const SPECTRAL: &[&str] = &[
    "#5e4fa2", "#3288bd", "#66c2a5", "#abdda4", "#e6f598", "#ffffbf", "#fee08b", "#fdae61",
    "#f46d43", "#d53e4f", "#9e0142",
];
const RD_BU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

/// Named palettes plus the thematic keys the predefined indices use
pub fn default_ramps() -> Vec<ColorRamp> {
    vec![
        ColorRamp::new("RdYlGn", RD_YL_GN),
        ColorRamp::new("Blues", BLUES),
        ColorRamp::new("YlGn", YL_GN),
        ColorRamp::new("BrBG", BR_BG),
        ColorRamp::new("Spectral", SPECTRAL),
        ColorRamp::new("RdBu", RD_BU),
        ColorRamp::new("vegetation", RD_YL_GN),
        ColorRamp::new("water", BLUES),
        ColorRamp::new("moisture", BR_BG),
    ]
}
