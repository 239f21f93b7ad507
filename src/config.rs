//! Application configuration
//!
//! Reference data (bands, ramps, indices, roles, users) lives in one JSON
//! document. It is validated once by [`AppConfig::build`]; after that the
//! catalogs are immutable and shared.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::access::{default_roles, default_users, AccessControl, RoleConfig, RoleTable, User, UserDirectory};
use crate::bands::{default_ramps, sentinel2_bands, Band, BandRegistry, ColorRamp, ColorRampCatalog};
use crate::catalogs::Catalogs;
use crate::error::{IndexLabError, Result};
use crate::indices::{predefined_indices, IndexCatalog, IndexDefinition};
use crate::session::AnalysisSession;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "INDEXLAB_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bands: Vec<Band>,
    pub color_ramps: Vec<ColorRamp>,
    pub indices: Vec<IndexDefinition>,
    pub roles: Vec<RoleConfig>,
    pub users: Vec<User>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bands: sentinel2_bands(),
            color_ramps: default_ramps(),
            indices: predefined_indices(),
            roles: default_roles(),
            users: default_users(),
        }
    }
}

/// Validated, immutable runtime state
#[derive(Debug, Clone)]
pub struct Runtime {
    pub catalogs: Arc<Catalogs>,
    pub access: Arc<AccessControl>,
    pub users: UserDirectory,
}

impl Runtime {
    pub fn new_session(&self) -> AnalysisSession {
        AnalysisSession::new(Arc::clone(&self.catalogs), Arc::clone(&self.access))
    }

    /// Resolve a `--user` email, if one was given
    pub fn user(&self, email: Option<&str>) -> Result<Option<&User>> {
        email.map(|e| self.users.find_by_email(e)).transpose()
    }
}

impl AppConfig {
    /// Read a config document; sections left out fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            IndexLabError::config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| IndexLabError::config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `$INDEXLAB_CONFIG`, or the defaults when it is unset
    pub fn from_env() -> Result<Self> {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(&path)),
            _ => {
                debug!("{} not set, using default configuration", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Validate everything and build the runtime
    ///
    /// Any inconsistency is reported as `Config`.
    pub fn build(self) -> Result<Runtime> {
        let bands = BandRegistry::new(self.bands).map_err(as_config)?;
        let ramps = ColorRampCatalog::new(self.color_ramps).map_err(as_config)?;
        let indices = IndexCatalog::new(self.indices, &bands, &ramps).map_err(as_config)?;
        let roles = RoleTable::from_config(self.roles).map_err(as_config)?;
        let users = UserDirectory::new(self.users, &roles).map_err(as_config)?;

        info!(
            "Catalogs ready: {} bands, {} indices, {} roles, {} users",
            bands.len(),
            indices.list_indices().len(),
            roles.iter().count(),
            users.len()
        );

        Ok(Runtime {
            catalogs: Arc::new(Catalogs::new(bands, ramps, indices)),
            access: Arc::new(AccessControl::new(roles)),
            users,
        })
    }
}

fn as_config(error: IndexLabError) -> IndexLabError {
    match error {
        IndexLabError::Config { .. } => error,
        other => IndexLabError::config(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_builds() {
        let runtime = AppConfig::default().build().unwrap();
        assert_eq!(runtime.catalogs.bands.len(), 13);
        assert_eq!(runtime.users.len(), 3);
        assert!(runtime.catalogs.ramps.contains("vegetation"));
    }

    #[test]
    fn test_bad_permission_tag() {
        let mut config = AppConfig::default();
        config.roles[1].permissions.push("create_analysys".to_string());
        assert!(matches!(config.build(), Err(IndexLabError::Config { .. })));
    }

    #[test]
    fn test_index_with_invalid_formula() {
        let mut config = AppConfig::default();
        config.indices[0].formula = "(B8 - B4 / (B8 + B4)".to_string();
        match config.build() {
            Err(IndexLabError::Config { reason }) => assert!(reason.contains("NDVI")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_index_with_unknown_ramp() {
        let mut config = AppConfig::default();
        config.indices[0].color_ramp = "Rainbow".to_string();
        assert!(matches!(config.build(), Err(IndexLabError::Config { .. })));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"roles": [{{"key": "ANALYST", "name": "Analyst", "permissions": ["create_analysis"]}}], "users": []}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.bands.len(), 13);
        assert_eq!(config.roles.len(), 1);

        let runtime = config.build().unwrap();
        assert!(runtime.users.is_empty());
        assert!(runtime.access.roles().contains("ANALYST"));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(IndexLabError::Config { .. })));
    }

    #[test]
    fn test_runtime_user_lookup() {
        let runtime = AppConfig::default().build().unwrap();
        assert!(runtime.user(None).unwrap().is_none());
        let user = runtime.user(Some("ricardo@torres.cl")).unwrap().unwrap();
        assert_eq!(user.client_id.as_deref(), Some("ricardo_torres"));
        assert!(runtime.user(Some("ghost@example.com")).is_err());
    }
}
