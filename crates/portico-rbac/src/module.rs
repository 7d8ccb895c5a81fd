//! Business modules guarded by the permission matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An ERP business area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Landing dashboards.
    Dashboard,
    /// User administration.
    Users,
    /// Customers, leads, and opportunities.
    Crm,
    /// Stock, warehouses, purchase orders.
    Inventory,
    /// Projects, tasks, timesheets.
    Projects,
    /// Invoices, payments, ledgers.
    Finance,
    /// Quotations and proposals.
    Quotations,
    /// Employees, leave, payroll.
    Hr,
    /// Cross-module reporting.
    Reports,
    /// System settings.
    Settings,
}

impl Module {
    /// Every module, in declaration order.
    pub const ALL: [Module; 10] = [
        Module::Dashboard,
        Module::Users,
        Module::Crm,
        Module::Inventory,
        Module::Projects,
        Module::Finance,
        Module::Quotations,
        Module::Hr,
        Module::Reports,
        Module::Settings,
    ];

    /// Wire name (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Users => "users",
            Module::Crm => "crm",
            Module::Inventory => "inventory",
            Module::Projects => "projects",
            Module::Finance => "finance",
            Module::Quotations => "quotations",
            Module::Hr => "hr",
            Module::Reports => "reports",
            Module::Settings => "settings",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownModule(s.to_string()))
    }
}
