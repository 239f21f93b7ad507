//! Error handling for IndexLab
//!
//! Problems found inside a formula are not errors at this level: the
//! validator reports them as `FormulaError` values. This enum covers the
//! requests that can be refused outright. Access denial is not an error
//! either, see `access::Access`.

use std::path::PathBuf;

use thiserror::Error;

use crate::formula::FormulaError;

/// Result type alias for IndexLab operations
pub type Result<T> = std::result::Result<T, IndexLabError>;

/// Main error type for IndexLab operations
#[derive(Error, Debug)]
pub enum IndexLabError {
    // Layer Errors
    #[error("Invalid formula: {}", join_formula_errors(.errors))]
    InvalidFormula { errors: Vec<FormulaError> },

    #[error("Invalid layer spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("Layer not found: {id}")]
    LayerNotFound { id: u64 },

    // Catalog Errors
    #[error("Unknown index: {name}")]
    UnknownIndex { name: String, available: Vec<String> },

    #[error("Unknown color ramp: {key}")]
    UnknownColorRamp { key: String },

    #[error("Unknown band: {band}")]
    UnknownBand { band: String },

    // Access Errors
    #[error("Unknown role: {role}")]
    UnknownRole { role: String },

    #[error("Unknown user: {email}")]
    UnknownUser { email: String },

    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // Session Errors
    #[error("Session not found: {path}")]
    SessionNotFound { path: PathBuf },

    #[error("Session file is corrupted: {reason}")]
    SessionCorrupted { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn join_formula_errors(errors: &[FormulaError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl IndexLabError {
    /// Shorthand for a configuration failure
    pub fn config(reason: impl Into<String>) -> Self {
        IndexLabError::Config {
            reason: reason.into(),
        }
    }

    /// Shorthand for a rejected layer spec
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        IndexLabError::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            IndexLabError::InvalidFormula { .. } => "INVALID_FORMULA",
            IndexLabError::InvalidSpec { .. } => "INVALID_SPEC",
            IndexLabError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            IndexLabError::UnknownIndex { .. } => "UNKNOWN_INDEX",
            IndexLabError::UnknownColorRamp { .. } => "UNKNOWN_COLOR_RAMP",
            IndexLabError::UnknownBand { .. } => "UNKNOWN_BAND",
            IndexLabError::UnknownRole { .. } => "UNKNOWN_ROLE",
            IndexLabError::UnknownUser { .. } => "UNKNOWN_USER",
            IndexLabError::Config { .. } => "CONFIG_ERROR",
            IndexLabError::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            IndexLabError::SessionCorrupted { .. } => "SESSION_CORRUPTED",
            IndexLabError::Io(_) => "IO_ERROR",
            IndexLabError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Everything raised by the core (validation, catalogs, the layer
    /// stack) is; the caller re-prompts or treats it as a no-op.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            IndexLabError::Config { .. }
                | IndexLabError::SessionCorrupted { .. }
                | IndexLabError::Io(_)
                | IndexLabError::Serialization(_)
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            IndexLabError::InvalidFormula { .. } => vec![
                "Fix the formula errors listed above and try again".to_string(),
                "Band references look like B4, B8 or B8A".to_string(),
            ],
            IndexLabError::InvalidSpec { .. } => {
                vec!["Fill in the missing fields and try again".to_string()]
            }
            IndexLabError::LayerNotFound { .. } => vec![
                "The layer was already removed; refresh the layer list".to_string(),
            ],
            IndexLabError::UnknownIndex { available, .. } => {
                vec![format!("Available indices: {}", available.join(", "))]
            }
            IndexLabError::UnknownColorRamp { .. } => {
                vec!["Run 'indexlab-cli ramps' to list color ramps".to_string()]
            }
            IndexLabError::UnknownBand { .. } => {
                vec!["Run 'indexlab-cli bands' to list band identifiers".to_string()]
            }
            IndexLabError::UnknownUser { .. } => {
                vec!["Check the e-mail address of the user".to_string()]
            }
            IndexLabError::SessionNotFound { .. } => {
                vec!["Create the session first with 'indexlab-cli init'".to_string()]
            }
            IndexLabError::SessionCorrupted { .. } => vec![
                "The session file was modified outside IndexLab".to_string(),
                "Restore it from a backup or start a new session".to_string(),
            ],
            _ => vec![],
        }
    }
}
