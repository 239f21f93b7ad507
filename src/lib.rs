//! IndexLab - Spectral Index Builder
//!
//! Composes satellite-imagery analyses out of band-math formulas:
//! 1. Formula validation - band references and syntax checked against a band registry
//! 2. Index building - predefined indices (NDVI, NDWI, ...) or generated from two bands
//! 3. Layer stack - ordered, toggleable layers for one analysis session
//!
//! # Architecture
//!
//! Reference data is validated once at startup into immutable catalogs
//! (`Catalogs`) shared by every session:
//! - Band registry and color ramps
//! - Predefined index catalog
//! - Role table (permission sets)
//!
//! An `AnalysisSession` owns the only mutable state, its `LayerStack`,
//! and gates every mutation through `AccessControl`.

pub mod access;
pub mod bands;
pub mod catalogs;
pub mod cli;
pub mod config;
pub mod error;
pub mod formula;
pub mod indices;
pub mod layers;
pub mod session;

pub use catalogs::Catalogs;
pub use config::{AppConfig, Runtime};
pub use error::{IndexLabError, Result};
