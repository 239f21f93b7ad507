//! Permission tags
//!
//! Closed set of capability keys. Configuration files spell them as
//! snake_case strings; they are parsed into this enum at startup so a typo
//! fails there rather than silently denying access later.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One gated capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageClients,
    ViewAllData,
    EditAllData,
    CreateAnalysis,
    EditAnalysis,
    ExportData,
    SystemSettings,
    ViewLogs,
    CreateIndices,
    UseQgisTools,
    ViewClients,
    ViewOwnData,
    ViewReports,
    DownloadReports,
    ViewRecommendations,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::ManageUsers,
        Permission::ManageClients,
        Permission::ViewAllData,
        Permission::EditAllData,
        Permission::CreateAnalysis,
        Permission::EditAnalysis,
        Permission::ExportData,
        Permission::SystemSettings,
        Permission::ViewLogs,
        Permission::CreateIndices,
        Permission::UseQgisTools,
        Permission::ViewClients,
        Permission::ViewOwnData,
        Permission::ViewReports,
        Permission::DownloadReports,
        Permission::ViewRecommendations,
    ];

    /// String key used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ManageClients => "manage_clients",
            Permission::ViewAllData => "view_all_data",
            Permission::EditAllData => "edit_all_data",
            Permission::CreateAnalysis => "create_analysis",
            Permission::EditAnalysis => "edit_analysis",
            Permission::ExportData => "export_data",
            Permission::SystemSettings => "system_settings",
            Permission::ViewLogs => "view_logs",
            Permission::CreateIndices => "create_indices",
            Permission::UseQgisTools => "use_qgis_tools",
            Permission::ViewClients => "view_clients",
            Permission::ViewOwnData => "view_own_data",
            Permission::ViewReports => "view_reports",
            Permission::DownloadReports => "download_reports",
            Permission::ViewRecommendations => "view_recommendations",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission '{}'", s))
    }
}
