//! Roles
//!
//! A role owns a fixed set of permissions. The table is built once at
//! startup and never changes afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::permission::Permission;
use crate::error::{IndexLabError, Result};

/// A named permission set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Lookup key carried by users (e.g., "ANALYST")
    pub key: String,
    /// Display name
    pub name: String,
    pub permissions: BTreeSet<Permission>,
}

impl Role {
    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Role as written in configuration, with permission strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub key: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl RoleConfig {
    fn new(key: &str, name: &str, permissions: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Parse every permission string into the closed enumeration
    pub fn into_role(self) -> Result<Role> {
        let permissions = self
            .permissions
            .iter()
            .map(|p| {
                p.parse::<Permission>()
                    .map_err(|e| IndexLabError::config(format!("role '{}': {}", self.key, e)))
            })
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Role {
            key: self.key,
            name: self.name,
            permissions,
        })
    }
}

/// Role key → role
#[derive(Debug, Clone)]
pub struct RoleTable {
    roles: BTreeMap<String, Role>,
}

impl RoleTable {
    pub fn new(roles: Vec<Role>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for role in roles {
            if table.contains_key(&role.key) {
                return Err(IndexLabError::config(format!("duplicate role '{}'", role.key)));
            }
            table.insert(role.key.clone(), role);
        }
        Ok(Self { roles: table })
    }

    /// Parse and build from configuration entries
    pub fn from_config(roles: Vec<RoleConfig>) -> Result<Self> {
        Self::new(
            roles
                .into_iter()
                .map(RoleConfig::into_role)
                .collect::<Result<Vec<_>>>()?,
        )
    }

    /// ADMIN, ANALYST and CLIENT
    pub fn defaults() -> Result<Self> {
        Self::from_config(default_roles())
    }

    pub fn get(&self, key: &str) -> Option<&Role> {
        self.roles.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.roles.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }
}

/// Roles of the reference deployment
pub fn default_roles() -> Vec<RoleConfig> {
    vec![
        RoleConfig::new(
            "ADMIN",
            "Administrador",
            &[
                "manage_users",
                "manage_clients",
                "view_all_data",
                "edit_all_data",
                "create_analysis",
                "export_data",
                "system_settings",
                "view_logs",
            ],
        ),
        RoleConfig::new(
            "ANALYST",
            "Analista",
            &[
                "view_all_data",
                "create_analysis",
                "edit_analysis",
                "export_data",
                "create_indices",
                "use_qgis_tools",
                "view_clients",
            ],
        ),
        RoleConfig::new(
            "CLIENT",
            "Cliente",
            &[
                "view_own_data",
                "view_reports",
                "download_reports",
                "view_recommendations",
            ],
        ),
    ]
}
