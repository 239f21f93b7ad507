//! Role-based access control
//!
//! Permissions, roles, navigation sections and the user directory.

mod control;
mod permission;
mod role;
mod section;
mod users;

pub use control::{Access, AccessControl, User};
pub use permission::Permission;
pub use role::{default_roles, Role, RoleConfig, RoleTable};
pub use section::Section;
pub use users::{default_users, UserDirectory};
