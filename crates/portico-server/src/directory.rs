//! Mock user directory backing the login endpoint.
//!
//! Passwords are compared in plain text. The directory exists so the
//! portals can be exercised end to end; it is not an identity provider.

use portico_rbac::{Role, Viewer};
use serde::{Deserialize, Serialize};

/// Password given to every built-in demo account.
pub const DEMO_PASSWORD: &str = "portico-demo";

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// Stable subject id carried in session tokens.
    pub subject: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text demo password.
    pub password: String,
    /// Role granted at login.
    pub role: Role,
    /// Department, used for department-scoped records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl DirectoryUser {
    fn demo(subject: &str, name: &str, email: &str, role: Role, department: Option<&str>) -> Self {
        Self {
            subject: subject.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role,
            department: department.map(str::to_string),
        }
    }

    /// One demo account per role.
    pub fn demo_users() -> Vec<Self> {
        vec![
            Self::demo("usr-admin", "Ada Admin", "admin@portico.test", Role::SuperAdmin, None),
            Self::demo("usr-sales-mgr", "Sam Sales", "sales.manager@portico.test", Role::SalesManager, Some("sales")),
            Self::demo("usr-sales-rep", "Riley Rep", "sales.rep@portico.test", Role::SalesRep, Some("sales")),
            Self::demo("usr-inventory", "Ivan Stock", "inventory@portico.test", Role::InventoryManager, Some("operations")),
            Self::demo("usr-projects", "Pat Planner", "projects@portico.test", Role::ProjectManager, Some("delivery")),
            Self::demo("usr-finance", "Fran Ledger", "finance@portico.test", Role::FinanceManager, Some("finance")),
            Self::demo("usr-hr", "Hana People", "hr@portico.test", Role::HrManager, Some("people")),
            Self::demo("usr-employee", "Eli Worker", "employee@portico.test", Role::Employee, Some("delivery")),
            Self::demo("usr-client", "Cleo Customer", "client@portico.test", Role::Client, None),
            Self::demo("usr-vendor", "Vic Supplier", "vendor@portico.test", Role::Vendor, None),
        ]
    }

    /// The scoping identity for this user.
    pub fn viewer(&self) -> Viewer {
        let viewer = Viewer::new(self.subject.clone());
        match &self.department {
            Some(department) => viewer.with_department(department.clone()),
            None => viewer,
        }
    }
}

/// Public view of an account, without the password.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
}

/// In-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<DirectoryUser>,
}

impl UserDirectory {
    /// Create a directory over `users`.
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Look up a user by email (case-insensitive) and password.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&DirectoryUser> {
        let email = email.trim();
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.password == password)
    }

    /// Look up a user by subject id.
    pub fn by_subject(&self, subject: &str) -> Option<&DirectoryUser> {
        self.users.iter().find(|u| u.subject == subject)
    }

    /// Scoping identity for `subject`; unknown subjects get no department.
    pub fn viewer(&self, subject: &str) -> Viewer {
        self.by_subject(subject)
            .map(DirectoryUser::viewer)
            .unwrap_or_else(|| Viewer::new(subject))
    }

    /// Accounts suitable for showing on the login page.
    pub fn accounts(&self) -> Vec<AccountSummary> {
        self.users
            .iter()
            .map(|u| AccountSummary {
                email: u.email.clone(),
                name: u.name.clone(),
                role: u.role,
            })
            .collect()
    }

    /// Emails that appear more than once.
    pub fn duplicate_emails(&self) -> Vec<String> {
        let mut seen = std::collections::BTreeSet::new();
        let mut dupes = std::collections::BTreeSet::new();
        for user in &self.users {
            let email = user.email.to_ascii_lowercase();
            if !seen.insert(email.clone()) {
                dupes.insert(email);
            }
        }
        dupes.into_iter().collect()
    }
}
