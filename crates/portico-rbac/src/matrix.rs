//! The role → module permission matrix.
//!
//! [`PermissionMatrix`] maps each [`Role`] to a [`RolePermissions`]: a set of
//! [`Permission`]s per [`Module`] plus a [`DataScope`]. Lookups are pure and
//! fail closed: a role without an entry has no access at all.
//!
//! # Example
//!
//! ```
//! use portico_rbac::{DataScope, Module, Permission, PermissionMatrix, Role};
//!
//! let matrix = PermissionMatrix::standard();
//! assert!(matrix.has_permission(Role::SalesRep, Module::Crm, Permission::Write));
//! assert!(!matrix.can_access_module(Role::Vendor, Module::Hr));
//! assert_eq!(matrix.data_scope(Role::Employee), Some(DataScope::Own));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{DataScope, Error, Module, Permission, Result, Role};

// ============================================================================
// RolePermissions
// ============================================================================

/// Module permissions and data scope for a single role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    /// Which records the role may see, regardless of module permission.
    pub data_scope: DataScope,
    /// Permission set per module. Missing modules grant nothing.
    #[serde(default)]
    pub modules: BTreeMap<Module, BTreeSet<Permission>>,
}

impl RolePermissions {
    /// Create an entry with the given scope and no module permissions.
    pub fn new(data_scope: DataScope) -> Self {
        Self {
            data_scope,
            modules: BTreeMap::new(),
        }
    }

    /// Grant `permissions` on `module`, merging with any existing grant.
    pub fn grant(mut self, module: Module, permissions: &[Permission]) -> Self {
        self.modules
            .entry(module)
            .or_default()
            .extend(permissions.iter().copied());
        self
    }

    /// Grant every permission on every module.
    pub fn grant_all(mut self) -> Self {
        for module in Module::ALL {
            self = self.grant(module, &Permission::ALL);
        }
        self
    }

    /// The permission set for `module`, if any was configured.
    pub fn permissions(&self, module: Module) -> Option<&BTreeSet<Permission>> {
        self.modules.get(&module)
    }

    /// Whether `permission` is granted on `module`.
    pub fn allows(&self, module: Module, permission: Permission) -> bool {
        self.permissions(module)
            .is_some_and(|set| set.contains(&permission))
    }

    /// Whether any permission is granted on `module`.
    pub fn can_access(&self, module: Module) -> bool {
        self.permissions(module).is_some_and(|set| !set.is_empty())
    }

    /// Modules with a non-empty permission set, in declaration order.
    pub fn accessible_modules(&self) -> Vec<Module> {
        self.modules
            .iter()
            .filter(|(_, perms)| !perms.is_empty())
            .map(|(module, _)| *module)
            .collect()
    }
}

// ============================================================================
// RoleProfile
// ============================================================================

/// What a role can reach, summarised for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleProfile {
    /// The role described.
    pub role: Role,
    /// Data scope; `None` when the role has no matrix entry.
    pub data_scope: Option<DataScope>,
    /// Modules the role has any permission on.
    pub modules: Vec<Module>,
}

// ============================================================================
// PermissionMatrix
// ============================================================================

/// Static mapping from role to module permissions and data scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    roles: BTreeMap<Role, RolePermissions>,
}

impl PermissionMatrix {
    /// An empty matrix. Every lookup denies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a matrix.
    pub fn builder() -> PermissionMatrixBuilder {
        PermissionMatrixBuilder::default()
    }

    /// The built-in ERP permission matrix.
    pub fn standard() -> Self {
        use Module::*;
        use Permission::*;

        const FULL: &[Permission] = &[Read, Write, Delete, Approve];

        Self::builder()
            .role(Role::SuperAdmin, RolePermissions::new(DataScope::Global).grant_all())
            .role(
                Role::SalesManager,
                RolePermissions::new(DataScope::Department)
                    .grant(Dashboard, &[Read])
                    .grant(Users, &[Read])
                    .grant(Crm, FULL)
                    .grant(Quotations, FULL)
                    .grant(Inventory, &[Read])
                    .grant(Reports, &[Read, Write]),
            )
            .role(
                Role::SalesRep,
                RolePermissions::new(DataScope::Assigned)
                    .grant(Dashboard, &[Read])
                    .grant(Crm, &[Read, Write])
                    .grant(Quotations, &[Read, Write])
                    .grant(Inventory, &[Read]),
            )
            .role(
                Role::InventoryManager,
                RolePermissions::new(DataScope::Department)
                    .grant(Dashboard, &[Read])
                    .grant(Inventory, FULL)
                    .grant(Quotations, &[Read])
                    .grant(Reports, &[Read]),
            )
            .role(
                Role::ProjectManager,
                RolePermissions::new(DataScope::Assigned)
                    .grant(Dashboard, &[Read])
                    .grant(Projects, FULL)
                    .grant(Crm, &[Read])
                    .grant(Hr, &[Read])
                    .grant(Reports, &[Read]),
            )
            .role(
                Role::FinanceManager,
                RolePermissions::new(DataScope::Global)
                    .grant(Dashboard, &[Read])
                    .grant(Finance, FULL)
                    .grant(Quotations, &[Read, Approve])
                    .grant(Reports, &[Read, Write]),
            )
            .role(
                Role::HrManager,
                RolePermissions::new(DataScope::Department)
                    .grant(Dashboard, &[Read])
                    .grant(Users, &[Read, Write])
                    .grant(Hr, FULL)
                    .grant(Reports, &[Read]),
            )
            .role(
                Role::Employee,
                RolePermissions::new(DataScope::Own)
                    .grant(Dashboard, &[Read])
                    .grant(Hr, &[Read])
                    .grant(Projects, &[Read]),
            )
            .role(
                Role::Client,
                RolePermissions::new(DataScope::Own)
                    .grant(Dashboard, &[Read])
                    .grant(Projects, &[Read])
                    .grant(Quotations, &[Read, Approve])
                    .grant(Finance, &[Read]),
            )
            .role(
                Role::Vendor,
                RolePermissions::new(DataScope::Own)
                    .grant(Dashboard, &[Read])
                    .grant(Inventory, &[Read])
                    .grant(Finance, &[Read]),
            )
            .build()
    }

    /// The entry for `role`, if present.
    pub fn get(&self, role: Role) -> Option<&RolePermissions> {
        self.roles.get(&role)
    }

    /// Iterate over configured roles and their permissions.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &RolePermissions)> {
        self.roles.iter().map(|(role, perms)| (*role, perms))
    }

    /// Whether `role` holds `permission` on `module`.
    pub fn has_permission(&self, role: Role, module: Module, permission: Permission) -> bool {
        self.get(role)
            .is_some_and(|entry| entry.allows(module, permission))
    }

    /// Whether `role` holds any permission on `module`.
    pub fn can_access_module(&self, role: Role, module: Module) -> bool {
        self.get(role).is_some_and(|entry| entry.can_access(module))
    }

    /// The data scope for `role`; `None` when the role has no entry.
    pub fn data_scope(&self, role: Role) -> Option<DataScope> {
        self.get(role).map(|entry| entry.data_scope)
    }

    /// Modules `role` has any permission on.
    pub fn accessible_modules(&self, role: Role) -> Vec<Module> {
        self.get(role)
            .map(RolePermissions::accessible_modules)
            .unwrap_or_default()
    }

    /// Permissions `role` holds on `module`, in declaration order.
    pub fn permissions_for(&self, role: Role, module: Module) -> Vec<Permission> {
        self.get(role)
            .and_then(|entry| entry.permissions(module))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Scope and accessible modules for `role`.
    pub fn profile(&self, role: Role) -> RoleProfile {
        RoleProfile {
            role,
            data_scope: self.data_scope(role),
            modules: self.accessible_modules(role),
        }
    }

    /// Roles without an entry.
    pub fn missing_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.roles.contains_key(role))
            .collect()
    }

    /// Check that every role has an entry.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_roles();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRoles(missing))
        }
    }
}

/// Builder for [`PermissionMatrix`].
#[derive(Debug, Default)]
pub struct PermissionMatrixBuilder {
    roles: BTreeMap<Role, RolePermissions>,
}

impl PermissionMatrixBuilder {
    /// Set the entry for `role`, replacing any previous one.
    pub fn role(mut self, role: Role, permissions: RolePermissions) -> Self {
        self.roles.insert(role, permissions);
        self
    }

    /// Finish building.
    pub fn build(self) -> PermissionMatrix {
        PermissionMatrix { roles: self.roles }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Standard matrix
    // ------------------------------------------------------------------------

    #[test]
    fn test_standard_matrix_covers_every_role() {
        assert!(PermissionMatrix::standard().validate().is_ok());
    }

    #[test]
    fn test_super_admin_has_everything() {
        let matrix = PermissionMatrix::standard();
        for module in Module::ALL {
            for permission in Permission::ALL {
                assert!(matrix.has_permission(Role::SuperAdmin, module, permission));
            }
        }
        assert_eq!(matrix.data_scope(Role::SuperAdmin), Some(DataScope::Global));
    }

    #[test]
    fn test_only_super_admin_reaches_settings() {
        let matrix = PermissionMatrix::standard();
        for role in Role::ALL {
            assert_eq!(
                matrix.can_access_module(role, Module::Settings),
                role == Role::SuperAdmin,
                "{role}"
            );
        }
    }

    #[test]
    fn test_sales_rep_permissions() {
        let matrix = PermissionMatrix::standard();
        assert!(matrix.has_permission(Role::SalesRep, Module::Crm, Permission::Write));
        assert!(!matrix.has_permission(Role::SalesRep, Module::Crm, Permission::Delete));
        assert!(!matrix.can_access_module(Role::SalesRep, Module::Finance));
        assert_eq!(matrix.data_scope(Role::SalesRep), Some(DataScope::Assigned));
    }

    #[test]
    fn test_accessible_modules_in_declaration_order() {
        let matrix = PermissionMatrix::standard();
        assert_eq!(
            matrix.accessible_modules(Role::Vendor),
            vec![Module::Dashboard, Module::Inventory, Module::Finance]
        );
    }

    #[test]
    fn test_permissions_for() {
        let matrix = PermissionMatrix::standard();
        assert_eq!(
            matrix.permissions_for(Role::Client, Module::Quotations),
            vec![Permission::Read, Permission::Approve]
        );
        assert!(matrix.permissions_for(Role::Client, Module::Hr).is_empty());
    }

    // ------------------------------------------------------------------------
    // Fail-closed behaviour
    // ------------------------------------------------------------------------

    #[test]
    fn test_missing_role_has_no_access() {
        let matrix = PermissionMatrix::builder()
            .role(Role::Employee, RolePermissions::new(DataScope::Own))
            .build();
        assert!(!matrix.can_access_module(Role::Client, Module::Dashboard));
        assert!(!matrix.has_permission(Role::Client, Module::Dashboard, Permission::Read));
        assert_eq!(matrix.data_scope(Role::Client), None);
        assert!(matrix.accessible_modules(Role::Client).is_empty());
    }

    #[test]
    fn test_empty_permission_set_denies_module() {
        let matrix = PermissionMatrix::builder()
            .role(
                Role::Employee,
                RolePermissions::new(DataScope::Own).grant(Module::Hr, &[]),
            )
            .build();
        assert!(matrix.get(Role::Employee).unwrap().permissions(Module::Hr).is_some());
        assert!(!matrix.can_access_module(Role::Employee, Module::Hr));
        assert!(matrix.accessible_modules(Role::Employee).is_empty());
    }

    #[test]
    fn test_validate_reports_missing_roles() {
        let matrix = PermissionMatrix::builder()
            .role(Role::SuperAdmin, RolePermissions::new(DataScope::Global))
            .build();
        match matrix.validate() {
            Err(Error::MissingRoles(missing)) => {
                assert_eq!(missing.len(), Role::ALL.len() - 1);
                assert!(!missing.contains(&Role::SuperAdmin));
            }
            other => unreachable!("expected MissingRoles, got {other:?}"),
        }
    }

    #[test]
    fn test_profile() {
        let profile = PermissionMatrix::standard().profile(Role::Employee);
        assert_eq!(profile.data_scope, Some(DataScope::Own));
        assert_eq!(
            profile.modules,
            vec![Module::Dashboard, Module::Projects, Module::Hr]
        );
    }

    #[test]
    fn test_grant_merges() {
        let perms = RolePermissions::new(DataScope::Own)
            .grant(Module::Crm, &[Permission::Read])
            .grant(Module::Crm, &[Permission::Write, Permission::Read]);
        assert_eq!(perms.permissions(Module::Crm).unwrap().len(), 2);
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    #[test]
    fn test_matrix_from_toml() {
        let toml_str = r#"
            [sales_rep]
            data_scope = "assigned"

            [sales_rep.modules]
            crm = ["read", "write"]
            finance = []
        "#;
        let matrix: PermissionMatrix = toml::from_str(toml_str).unwrap();
        assert!(matrix.has_permission(Role::SalesRep, Module::Crm, Permission::Write));
        assert!(!matrix.can_access_module(Role::SalesRep, Module::Finance));
        assert_eq!(matrix.missing_roles().len(), Role::ALL.len() - 1);
    }
}
