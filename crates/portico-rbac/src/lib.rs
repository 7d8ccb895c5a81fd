//! # portico-rbac
//!
//! Role-based access control for the Portico ERP portals.
//!
//! This crate provides:
//! - [`Role`], [`Module`], [`Permission`] - the enumerated vocabulary
//! - [`PermissionMatrix`] - role → module permission sets plus a data scope
//! - [`DataScope`] / [`ScopedRecord`] - per-role record visibility
//!
//! All lookups are pure and fail closed: a role with no matrix entry has
//! no module access and no data visibility.

#![warn(clippy::all)]

pub mod error;
pub mod matrix;
pub mod module;
pub mod permission;
pub mod role;
pub mod scope;

mod proptests;

pub use error::{Error, Result};
pub use matrix::{PermissionMatrix, PermissionMatrixBuilder, RolePermissions, RoleProfile};
pub use module::Module;
pub use permission::Permission;
pub use role::Role;
pub use scope::{filter_visible, DataScope, ScopedRecord, Viewer};
