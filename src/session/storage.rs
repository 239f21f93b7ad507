//! Session persistence
//!
//! A session is stored as one pretty-printed JSON file. The stack state
//! carries a SHA-256 checksum so hand edits and truncation are caught on
//! load instead of producing a half-valid stack.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::analysis::AnalysisSession;
use crate::access::AccessControl;
use crate::catalogs::Catalogs;
use crate::error::{IndexLabError, Result};
use crate::layers::{LayerStack, LayerStackState};

/// Current session file layout
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    schema_version: u32,
    session_id: Uuid,
    created_at: DateTime<Utc>,
    saved_at: DateTime<Utc>,
    /// Hex SHA-256 of the serialized `stack`
    checksum: String,
    stack: LayerStackState,
}

/// Hex SHA-256 of a stack state's canonical JSON
pub fn stack_checksum(state: &LayerStackState) -> Result<String> {
    let bytes = serde_json::to_vec(state)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

impl AnalysisSession {
    /// Write the session to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let stack = self.stack().state();
        let file = SessionFile {
            schema_version: SCHEMA_VERSION,
            session_id: self.id(),
            created_at: self.created_at(),
            saved_at: Utc::now(),
            checksum: stack_checksum(&stack)?,
            stack,
        };

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &file)?;

        info!(
            "Saved session {} ({} layers) to {}",
            file.session_id,
            file.stack.layers.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a session back, re-validating every layer against `catalogs`
    ///
    /// # Errors
    /// - `SessionNotFound` if `path` does not exist
    /// - `SessionCorrupted` on unreadable JSON, an unknown schema version,
    ///   a checksum mismatch or a layer the catalogs reject
    pub fn load(
        path: &Path,
        catalogs: Arc<Catalogs>,
        access: Arc<AccessControl>,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(IndexLabError::SessionNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let file: SessionFile =
            serde_json::from_reader(reader).map_err(|e| IndexLabError::SessionCorrupted {
                reason: format!("unreadable session file: {}", e),
            })?;

        if file.schema_version != SCHEMA_VERSION {
            return Err(IndexLabError::SessionCorrupted {
                reason: format!(
                    "unsupported schema version {} (expected {})",
                    file.schema_version, SCHEMA_VERSION
                ),
            });
        }

        let actual = stack_checksum(&file.stack)?;
        if actual != file.checksum {
            return Err(IndexLabError::SessionCorrupted {
                reason: format!("checksum mismatch (stored {}, computed {})", file.checksum, actual),
            });
        }
        debug!("Checksum verified for session {}", file.session_id);

        let stack = LayerStack::restore(
            file.stack,
            Arc::clone(&catalogs.bands),
            Arc::clone(&catalogs.ramps),
        )?;

        info!(
            "Loaded session {} ({} layers) from {}",
            file.session_id,
            stack.len(),
            path.display()
        );
        Ok(Self::from_parts(
            file.session_id,
            file.created_at,
            catalogs,
            access,
            stack,
        ))
    }
}
