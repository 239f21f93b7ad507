//! Layer entities
//!
//! A layer is one visual unit of the composition: raw imagery or a
//! computed index. Its place in the stack is its order; only the
//! visibility flag changes after creation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a layer renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Raw imagery (e.g., true color composite)
    Raster,
    /// A band-math index
    Index,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Raster => f.write_str("raster"),
            LayerKind::Index => f.write_str("index"),
        }
    }
}

/// A layer in the stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique within its stack, never reused
    pub id: u64,
    pub name: String,
    pub kind: LayerKind,
    pub visible: bool,
    /// Validated band-math formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_ramp: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Layer {
    pub(crate) fn from_spec(id: u64, spec: LayerSpec) -> Self {
        Self {
            id,
            name: spec.name.trim().to_string(),
            kind: spec.kind,
            visible: true,
            formula: spec.formula,
            color_ramp: spec.color_ramp,
            created_at: Utc::now(),
        }
    }

    /// Flip visibility, returning the new state
    pub(crate) fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

/// Request to create a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub color_ramp: Option<String>,
}

impl LayerSpec {
    /// Raw imagery layer
    pub fn raster(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Raster,
            formula: None,
            color_ramp: None,
        }
    }

    /// Index layer computed from `formula`
    pub fn index(name: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Index,
            formula: Some(formula.into()),
            color_ramp: None,
        }
    }

    pub fn with_color_ramp(mut self, key: impl Into<String>) -> Self {
        self.color_ramp = Some(key.into());
        self
    }
}
