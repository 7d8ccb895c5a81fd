//! User roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A user role. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every portal and module.
    SuperAdmin,
    /// Runs the sales team.
    SalesManager,
    /// Works assigned sales accounts.
    SalesRep,
    /// Owns stock and warehouses.
    InventoryManager,
    /// Runs projects and their staffing.
    ProjectManager,
    /// Owns invoices, payments, and approvals.
    FinanceManager,
    /// Owns people records.
    HrManager,
    /// Self-service employee.
    Employee,
    /// External customer.
    Client,
    /// External supplier.
    Vendor,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 10] = [
        Role::SuperAdmin,
        Role::SalesManager,
        Role::SalesRep,
        Role::InventoryManager,
        Role::ProjectManager,
        Role::FinanceManager,
        Role::HrManager,
        Role::Employee,
        Role::Client,
        Role::Vendor,
    ];

    /// Wire name (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SalesManager => "sales_manager",
            Role::SalesRep => "sales_rep",
            Role::InventoryManager => "inventory_manager",
            Role::ProjectManager => "project_manager",
            Role::FinanceManager => "finance_manager",
            Role::HrManager => "hr_manager",
            Role::Employee => "employee",
            Role::Client => "client",
            Role::Vendor => "vendor",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::SalesManager => "Sales Manager",
            Role::SalesRep => "Sales Representative",
            Role::InventoryManager => "Inventory Manager",
            Role::ProjectManager => "Project Manager",
            Role::FinanceManager => "Finance Manager",
            Role::HrManager => "HR Manager",
            Role::Employee => "Employee",
            Role::Client => "Client",
            Role::Vendor => "Vendor",
        }
    }

    /// Whether the role belongs to someone outside the company.
    pub fn is_external(&self) -> bool {
        matches!(self, Role::Client | Role::Vendor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}
