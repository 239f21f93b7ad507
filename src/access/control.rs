//! Access Control
//!
//! `has_permission` is the single authorization primitive. A denial is
//! an ordinary outcome (`Access::Restricted`) that the caller renders as
//! "access restricted", never an error.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::permission::Permission;
use super::role::{Role, RoleTable};
use super::section::Section;

/// An authenticated user, supplied by the session provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    /// Role key in the role table
    pub role: String,
    /// Client account the user belongs to, for client users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Outcome of a gated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
    Granted(T),
    /// The caller lacks `permission`
    Restricted { permission: Permission },
}

impl<T> Access<T> {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }

    /// The granted value, if any
    pub fn granted(self) -> Option<T> {
        match self {
            Access::Granted(value) => Some(value),
            Access::Restricted { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
        match self {
            Access::Granted(value) => Access::Granted(f(value)),
            Access::Restricted { permission } => Access::Restricted { permission },
        }
    }
}

impl<T> fmt::Display for Access<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Granted(_) => f.write_str("Access granted"),
            Access::Restricted { permission } => {
                write!(f, "Access restricted (requires '{}')", permission)
            }
        }
    }
}

/// Role-based permission checks over a fixed role table
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: RoleTable,
}

impl AccessControl {
    pub fn new(roles: RoleTable) -> Self {
        Self { roles }
    }

    /// Role of `user`, if it is in the table
    pub fn role_of(&self, user: &User) -> Option<&Role> {
        self.roles.get(&user.role)
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Check whether `user` holds `permission`
    ///
    /// False for an absent user and for a role missing from the table.
    pub fn has_permission(&self, user: Option<&User>, permission: Permission) -> bool {
        let Some(user) = user else {
            return false;
        };
        let allowed = self
            .role_of(user)
            .map(|role| role.allows(permission))
            .unwrap_or(false);
        debug!("{} {} {}", user.email, if allowed { "holds" } else { "lacks" }, permission);
        allowed
    }

    /// Gate a request without running anything
    pub fn check(&self, user: Option<&User>, permission: Permission) -> Access<()> {
        self.guard(user, permission, || ())
    }

    /// Run `f` only if `user` holds `permission`
    pub fn guard<T>(
        &self,
        user: Option<&User>,
        permission: Permission,
        f: impl FnOnce() -> T,
    ) -> Access<T> {
        if self.has_permission(user, permission) {
            Access::Granted(f())
        } else {
            warn!(
                "Access restricted for {}: requires {}",
                user.map(|u| u.email.as_str()).unwrap_or("anonymous"),
                permission
            );
            Access::Restricted { permission }
        }
    }

    /// Whether `user` may open `section`
    pub fn can_view(&self, user: Option<&User>, section: Section) -> bool {
        match section.required_permission() {
            None => user.is_some(),
            Some(permission) => self.has_permission(user, permission),
        }
    }

    /// Sections `user` may open, in navigation order
    pub fn visible_sections(&self, user: Option<&User>) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|s| self.can_view(user, *s))
            .collect()
    }
}
