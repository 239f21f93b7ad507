//! Navigation sections and the permission each one requires

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::permission::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Analysis,
    LayerWorkspace,
    Clients,
    Reports,
    Users,
    Settings,
}

impl Section {
    /// Navigation order
    pub const ALL: &'static [Section] = &[
        Section::Dashboard,
        Section::Analysis,
        Section::LayerWorkspace,
        Section::Clients,
        Section::Reports,
        Section::Users,
        Section::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Analysis => "analysis",
            Section::LayerWorkspace => "layer_workspace",
            Section::Clients => "clients",
            Section::Reports => "reports",
            Section::Users => "users",
            Section::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Analysis => "Analysis",
            Section::LayerWorkspace => "Layer Workspace",
            Section::Clients => "Clients",
            Section::Reports => "Reports",
            Section::Users => "Users",
            Section::Settings => "Settings",
        }
    }

    /// Permission gating this section; `None` means any signed-in user
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            Section::Dashboard => None,
            Section::Analysis | Section::LayerWorkspace => Some(Permission::CreateAnalysis),
            Section::Clients => Some(Permission::ViewClients),
            Section::Reports => Some(Permission::ViewReports),
            Section::Users => Some(Permission::ManageUsers),
            Section::Settings => Some(Permission::SystemSettings),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.id() == key)
            .ok_or_else(|| format!("unknown section '{}'", s))
    }
}
