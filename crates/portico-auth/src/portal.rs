//! Portal paths and default routes per role.
//!
//! A portal is the role-scoped section of the application named by the
//! first path segment (`/sales/...`, `/hr/...`). [`PortalMap`] holds the
//! portal prefixes each role may enter and the default route each role is
//! sent to when it strays.

use std::collections::{BTreeMap, BTreeSet};

use portico_rbac::Role;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Portal prefixes and default-redirect table keyed by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalMap {
    /// Portal prefixes (e.g. `/sales`) each role may enter.
    #[serde(default)]
    pub paths: BTreeMap<Role, Vec<String>>,
    /// Landing route for each role.
    #[serde(default)]
    pub redirects: BTreeMap<Role, String>,
}

/// First non-empty path segment, if any.
pub fn portal_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

impl PortalMap {
    /// The built-in portal layout.
    pub fn standard() -> Self {
        let mut map = Self::default();
        map.insert(
            Role::SuperAdmin,
            &[
                "/admin",
                "/sales",
                "/inventory",
                "/projects",
                "/finance",
                "/hr",
                "/employee",
                "/client",
                "/vendor",
            ],
            "/admin/dashboard",
        );
        map.insert(Role::SalesManager, &["/sales"], "/sales/dashboard");
        map.insert(Role::SalesRep, &["/sales"], "/sales/dashboard");
        map.insert(Role::InventoryManager, &["/inventory"], "/inventory/dashboard");
        map.insert(Role::ProjectManager, &["/projects"], "/projects/dashboard");
        map.insert(Role::FinanceManager, &["/finance"], "/finance/dashboard");
        map.insert(Role::HrManager, &["/hr"], "/hr/dashboard");
        map.insert(Role::Employee, &["/employee"], "/employee/dashboard");
        map.insert(Role::Client, &["/client"], "/client/dashboard");
        map.insert(Role::Vendor, &["/vendor"], "/vendor/dashboard");
        map
    }

    /// Set the portals and default route for `role`.
    pub fn insert(&mut self, role: Role, paths: &[&str], default_route: &str) {
        self.paths
            .insert(role, paths.iter().map(|p| (*p).to_string()).collect());
        self.redirects.insert(role, default_route.to_string());
    }

    /// Every portal segment configured for any role.
    pub fn segments(&self) -> BTreeSet<&str> {
        self.paths
            .values()
            .flatten()
            .filter_map(|p| portal_segment(p))
            .collect()
    }

    /// Whether `segment` names a portal of any role.
    pub fn is_portal(&self, segment: &str) -> bool {
        self.paths
            .values()
            .flatten()
            .any(|p| portal_segment(p) == Some(segment))
    }

    /// Whether `role`'s configured portal paths contain `segment`.
    pub fn allows(&self, role: Role, segment: &str) -> bool {
        self.paths
            .get(&role)
            .is_some_and(|paths| paths.iter().any(|p| portal_segment(p) == Some(segment)))
    }

    /// Portal prefixes for `role`.
    pub fn portals(&self, role: Role) -> &[String] {
        self.paths.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The configured default route for `role`.
    pub fn default_route(&self, role: Role) -> Option<&str> {
        self.redirects.get(&role).map(String::as_str)
    }

    /// The default route for `role`, only if it lands inside the role's
    /// own portals. Anything else would bounce forever.
    pub fn safe_default_route(&self, role: Role) -> Option<&str> {
        self.default_route(role)
            .filter(|route| portal_segment(route).is_some_and(|seg| self.allows(role, seg)))
    }

    /// Check that every default route resolves inside its role's portals.
    pub fn validate(&self) -> Result<()> {
        for (role, route) in &self.redirects {
            if self.safe_default_route(*role).is_none() {
                return Err(Error::RedirectOutsidePortal {
                    role: *role,
                    route: route.clone(),
                });
            }
        }
        Ok(())
    }
}
