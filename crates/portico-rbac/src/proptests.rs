//! Property-based tests for the permission matrix.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{DataScope, Module, Permission, PermissionMatrix, Role, RolePermissions};
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_module() -> impl Strategy<Value = Module> {
        prop::sample::select(Module::ALL.to_vec())
    }

    fn any_permission() -> impl Strategy<Value = Permission> {
        prop::sample::select(Permission::ALL.to_vec())
    }

    fn any_scope() -> impl Strategy<Value = DataScope> {
        prop::sample::select(vec![
            DataScope::Global,
            DataScope::Department,
            DataScope::Assigned,
            DataScope::Own,
        ])
    }

    proptest! {
        #[test]
        fn test_empty_permission_set_never_grants_access(
            role in any_role(),
            module in any_module(),
            scope in any_scope(),
        ) {
            let matrix = PermissionMatrix::builder()
                .role(role, RolePermissions::new(scope).grant(module, &[]))
                .build();
            prop_assert!(!matrix.can_access_module(role, module));
        }

        #[test]
        fn test_module_access_iff_some_permission(
            role in any_role(),
            module in any_module(),
        ) {
            let matrix = PermissionMatrix::standard();
            let any = Permission::ALL
                .iter()
                .any(|p| matrix.has_permission(role, module, *p));
            prop_assert_eq!(matrix.can_access_module(role, module), any);
        }

        #[test]
        fn test_absent_role_is_fail_closed(
            present in any_role(),
            absent in any_role(),
            module in any_module(),
            permission in any_permission(),
        ) {
            prop_assume!(present != absent);
            let matrix = PermissionMatrix::builder()
                .role(present, RolePermissions::new(DataScope::Global).grant_all())
                .build();
            prop_assert!(!matrix.has_permission(absent, module, permission));
            prop_assert!(!matrix.can_access_module(absent, module));
            prop_assert_eq!(matrix.data_scope(absent), None);
        }

        #[test]
        fn test_accessible_modules_agree_with_can_access(role in any_role()) {
            let matrix = PermissionMatrix::standard();
            let listed = matrix.accessible_modules(role);
            for module in Module::ALL {
                prop_assert_eq!(listed.contains(&module), matrix.can_access_module(role, module));
            }
        }
    }
}
