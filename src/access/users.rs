//! User directory
//!
//! Stand-in for the authentication provider: resolves an email to the
//! user record the access layer consumes.

use log::debug;

use super::control::User;
use super::role::RoleTable;
use crate::error::{IndexLabError, Result};

#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Every user must carry a role present in `roles`, and emails and ids
    /// must be unique
    pub fn new(users: Vec<User>, roles: &RoleTable) -> Result<Self> {
        for (i, user) in users.iter().enumerate() {
            if !roles.contains(&user.role) {
                return Err(IndexLabError::UnknownRole {
                    role: user.role.clone(),
                });
            }
            if users[..i]
                .iter()
                .any(|other| other.email.eq_ignore_ascii_case(&user.email) || other.id == user.id)
            {
                return Err(IndexLabError::config(format!(
                    "duplicate user '{}'",
                    user.email
                )));
            }
        }
        Ok(Self { users })
    }

    /// Demo accounts, one per default role
    pub fn defaults(roles: &RoleTable) -> Result<Self> {
        Self::new(default_users(), roles)
    }

    /// Case-insensitive lookup by email
    pub fn find_by_email(&self, email: &str) -> Result<&User> {
        let email = email.trim();
        let user = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| IndexLabError::UnknownUser {
                email: email.to_string(),
            })?;
        debug!("Resolved {} as {} ({})", email, user.name, user.role);
        Ok(user)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            email: "admin@semillero.cl".to_string(),
            name: "Administrador".to_string(),
            role: "ADMIN".to_string(),
            client_id: None,
        },
        User {
            id: 2,
            email: "analista@semillero.cl".to_string(),
            name: "Ana Lista".to_string(),
            role: "ANALYST".to_string(),
            client_id: None,
        },
        User {
            id: 3,
            email: "ricardo@torres.cl".to_string(),
            name: "Ricardo Torres".to_string(),
            role: "CLIENT".to_string(),
            client_id: Some("ricardo_torres".to_string()),
        },
    ]
}
