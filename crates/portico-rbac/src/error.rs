//! Error types for portico-rbac

use thiserror::Error;

use crate::Role;

/// Result type alias for portico-rbac operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in portico-rbac
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A role name did not match any known role.
    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    /// A module name did not match any known module.
    #[error("unknown module: '{0}'")]
    UnknownModule(String),

    /// A permission name did not match any known permission.
    #[error("unknown permission: '{0}'")]
    UnknownPermission(String),

    /// The permission matrix has no entry for one or more roles.
    #[error("permission matrix has no entry for: {}", join_roles(.0))]
    MissingRoles(Vec<Role>),
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
