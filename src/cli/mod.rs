//! CLI Module
//!
//! Command-line interface for the spectral index builder.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::formula::OperationKind;

/// IndexLab - spectral index builder for satellite imagery analyses
#[derive(Parser, Debug)]
#[command(name = "indexlab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to $INDEXLAB_CONFIG, then built-in data)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the band registry
    #[command(name = "bands")]
    Bands,

    /// List the color ramps
    #[command(name = "ramps")]
    Ramps,

    /// List the predefined indices
    #[command(name = "indices")]
    Indices,

    /// Generate a formula from an operation and two bands
    #[command(name = "formula")]
    Formula {
        /// normalized-difference, ratio, difference or custom
        operation: OperationKind,

        /// First band (numerator)
        band_a: Option<String>,

        /// Second band (denominator)
        band_b: Option<String>,

        /// Formula text for the custom operation
        #[arg(long)]
        custom: Option<String>,
    },

    /// Validate a band-math formula
    #[command(name = "validate")]
    Validate {
        /// Formula text, e.g. "(B8 - B4) / (B8 + B4)"
        formula: String,
    },

    /// Show which sections a user can open
    #[command(name = "sections")]
    Sections {
        /// User email
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Create an empty session file
    #[command(name = "init")]
    Init {
        /// Path for the session file
        path: PathBuf,
    },

    /// List the layers of a session
    #[command(name = "layers")]
    Layers {
        /// Path to the session file
        path: PathBuf,
    },

    /// Add a raster layer
    #[command(name = "add-raster")]
    AddRaster {
        /// Path to the session file
        path: PathBuf,

        /// Layer name
        name: String,

        /// Optional band-math formula for the composite
        #[arg(long)]
        formula: Option<String>,

        /// Color ramp key
        #[arg(long)]
        ramp: Option<String>,

        /// Acting user email
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Add a layer for a predefined index
    #[command(name = "add-index")]
    AddIndex {
        /// Path to the session file
        path: PathBuf,

        /// Index name, e.g. NDVI
        index: String,

        /// Acting user email
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Build a custom index layer
    #[command(name = "build-index")]
    BuildIndex {
        /// Path to the session file
        path: PathBuf,

        /// Layer name
        name: String,

        /// normalized-difference, ratio, difference or custom
        #[arg(short, long)]
        operation: OperationKind,

        /// First band (numerator)
        #[arg(long = "band-a")]
        band_a: Option<String>,

        /// Second band (denominator)
        #[arg(long = "band-b")]
        band_b: Option<String>,

        /// Formula text for the custom operation
        #[arg(long)]
        custom: Option<String>,

        /// Color ramp key
        #[arg(long)]
        ramp: Option<String>,

        /// Acting user email
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Toggle the visibility of a layer
    #[command(name = "toggle")]
    Toggle {
        /// Path to the session file
        path: PathBuf,

        /// Layer id
        id: u64,

        /// Acting user email
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Remove a layer
    #[command(name = "remove")]
    Remove {
        /// Path to the session file
        path: PathBuf,

        /// Layer id
        id: u64,

        /// Acting user email
        #[arg(short, long)]
        user: Option<String>,
    },
}
