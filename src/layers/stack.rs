//! Layer Stack
//!
//! The ordered, mutable collection of layers for one analysis session.
//! Layers are appended at the end; removal keeps the relative order of
//! the rest. Ids come from a counter that is never reset, so an id is
//! never handed out twice, even after its layer is gone.
//!
//! The stack knows nothing about users. Callers check access first
//! (see `session::AnalysisSession`).

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::layer::{Layer, LayerKind, LayerSpec};
use crate::bands::{BandRegistry, ColorRampCatalog};
use crate::error::{IndexLabError, Result};

/// Id given to the first layer of a fresh stack
pub const FIRST_LAYER_ID: u64 = 1;

/// Serializable contents of a stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStackState {
    /// Id the next added layer will get
    pub next_id: u64,
    /// Layers, bottom first
    pub layers: Vec<Layer>,
}

/// Ordered stack of layers
#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u64,
    bands: Arc<BandRegistry>,
    ramps: Arc<ColorRampCatalog>,
}

impl LayerStack {
    /// Create an empty stack validating against the given catalogs
    pub fn new(bands: Arc<BandRegistry>, ramps: Arc<ColorRampCatalog>) -> Self {
        Self {
            layers: Vec::new(),
            next_id: FIRST_LAYER_ID,
            bands,
            ramps,
        }
    }

    /// Rebuild a stack from saved state
    ///
    /// Every layer is checked again against the current catalogs, and the
    /// saved counter must be ahead of every saved id.
    pub fn restore(
        state: LayerStackState,
        bands: Arc<BandRegistry>,
        ramps: Arc<ColorRampCatalog>,
    ) -> Result<Self> {
        // MAX would leave no id to hand out
        if state.next_id < FIRST_LAYER_ID || state.next_id == u64::MAX {
            return Err(IndexLabError::SessionCorrupted {
                reason: format!("next layer id {} is out of range", state.next_id),
            });
        }

        let stack = Self {
            layers: Vec::new(),
            next_id: state.next_id,
            bands,
            ramps,
        };

        let mut ids = BTreeSet::new();
        for layer in &state.layers {
            if layer.id < FIRST_LAYER_ID || layer.id >= state.next_id {
                return Err(IndexLabError::SessionCorrupted {
                    reason: format!(
                        "layer id {} is outside the assigned range (next id {})",
                        layer.id, state.next_id
                    ),
                });
            }
            if !ids.insert(layer.id) {
                return Err(IndexLabError::SessionCorrupted {
                    reason: format!("layer id {} appears twice", layer.id),
                });
            }
            stack
                .check(&layer.name, layer.kind, layer.formula.as_deref(), layer.color_ramp.as_deref())
                .map_err(|e| IndexLabError::SessionCorrupted {
                    reason: format!("layer {}: {}", layer.id, e),
                })?;
        }

        Ok(Self {
            layers: state.layers,
            ..stack
        })
    }

    /// Snapshot of the stack for persistence
    pub fn state(&self) -> LayerStackState {
        LayerStackState {
            next_id: self.next_id,
            layers: self.layers.clone(),
        }
    }

    fn check(
        &self,
        name: &str,
        kind: LayerKind,
        formula: Option<&str>,
        color_ramp: Option<&str>,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(IndexLabError::invalid_spec("layer name is required"));
        }

        if kind == LayerKind::Index && formula.is_none() {
            return Err(IndexLabError::invalid_spec("index layers require a formula"));
        }

        if let Some(formula) = formula {
            let result = self.bands.validate(formula);
            if !result.is_valid {
                return Err(IndexLabError::InvalidFormula {
                    errors: result.errors,
                });
            }
        }

        if let Some(key) = color_ramp {
            self.ramps.require(key)?;
        }

        Ok(())
    }

    /// Append a layer to the top of the stack
    ///
    /// # Errors
    /// - `InvalidSpec` if the name is blank, an index layer has no formula,
    ///   or the id counter is exhausted
    /// - `InvalidFormula` if the formula does not validate against the registry
    /// - `UnknownColorRamp` if the ramp key is not in the catalog
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<Layer> {
        if let Err(e) = self.check(
            &spec.name,
            spec.kind,
            spec.formula.as_deref(),
            spec.color_ramp.as_deref(),
        ) {
            warn!("Rejected layer '{}': {}", spec.name, e);
            return Err(e);
        }

        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| IndexLabError::invalid_spec("no layer ids left in this stack"))?;

        let layer = Layer::from_spec(id, spec);
        info!("Added {} layer {} '{}'", layer.kind, layer.id, layer.name);
        self.layers.push(layer.clone());
        Ok(layer)
    }

    /// Flip the visibility of a layer
    pub fn toggle_visibility(&mut self, id: u64) -> Result<Layer> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(IndexLabError::LayerNotFound { id })?;

        let visible = layer.toggle();
        info!("Layer {} is now {}", id, if visible { "visible" } else { "hidden" });
        Ok(layer.clone())
    }

    /// Remove a layer, keeping the order of the others
    ///
    /// Removing the same id twice fails the second time with `LayerNotFound`.
    pub fn remove_layer(&mut self, id: u64) -> Result<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or(IndexLabError::LayerNotFound { id })?;

        let removed = self.layers.remove(index);
        info!("Removed layer {} '{}'", removed.id, removed.name);
        Ok(removed)
    }

    /// Fresh copy of the layers, bottom first
    pub fn list_layers(&self) -> Vec<Layer> {
        self.layers.clone()
    }

    /// Fresh copy of the visible layers, bottom first
    pub fn visible_layers(&self) -> Vec<Layer> {
        self.layers.iter().filter(|l| l.visible).cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Id the next added layer will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
