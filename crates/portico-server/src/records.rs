//! Mock business records served by `/api/records/{module}`.

use std::collections::BTreeMap;

use portico_rbac::{Module, ScopedRecord};
use serde::Serialize;

/// A business record with ownership metadata used for data scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Record id.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Subject id of the owner.
    pub owner: String,
    /// Owning department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Subject ids the record is assigned to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
}

impl Record {
    /// Create a record.
    pub fn new(id: &str, title: &str, owner: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            owner: owner.to_string(),
            department: None,
            assignees: Vec::new(),
        }
    }

    /// Set the owning department.
    pub fn in_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    /// Assign the record to `subjects`.
    pub fn assigned_to(mut self, subjects: &[&str]) -> Self {
        self.assignees = subjects.iter().map(|s| (*s).to_string()).collect();
        self
    }
}

impl ScopedRecord for Record {
    fn owner(&self) -> &str {
        &self.owner
    }

    fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    fn assignees(&self) -> &[String] {
        &self.assignees
    }
}

/// Read-only record store keyed by module.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: BTreeMap<Module, Vec<Record>>,
}

impl RecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under `module`.
    pub fn insert(&mut self, module: Module, record: Record) {
        self.records.entry(module).or_default().push(record);
    }

    /// Records for `module`.
    pub fn records(&self, module: Module) -> &[Record] {
        self.records.get(&module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total record count.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Demo data owned by the built-in directory users.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let seed = [
            (
                Module::Dashboard,
                Record::new("dash-1", "Company announcements", "usr-admin"),
            ),
            (
                Module::Users,
                Record::new("user-1", "Sales team roster", "usr-sales-mgr").in_department("sales"),
            ),
            (
                Module::Users,
                Record::new("user-2", "People team roster", "usr-hr").in_department("people"),
            ),
            (
                Module::Crm,
                Record::new("crm-1", "Acme Corp lead", "usr-sales-rep")
                    .in_department("sales")
                    .assigned_to(&["usr-sales-rep"]),
            ),
            (
                Module::Crm,
                Record::new("crm-2", "Globex renewal", "usr-sales-mgr")
                    .in_department("sales")
                    .assigned_to(&["usr-sales-rep"]),
            ),
            (
                Module::Crm,
                Record::new("crm-3", "Initech opportunity", "usr-sales-mgr").in_department("sales"),
            ),
            (
                Module::Crm,
                Record::new("crm-4", "Umbrella partnership", "usr-admin")
                    .in_department("partnerships"),
            ),
            (
                Module::Inventory,
                Record::new("stk-1", "Warehouse A stock count", "usr-inventory")
                    .in_department("operations"),
            ),
            (
                Module::Inventory,
                Record::new("stk-2", "Steel delivery schedule", "usr-vendor")
                    .in_department("operations"),
            ),
            (
                Module::Projects,
                Record::new("prj-1", "ERP rollout", "usr-projects")
                    .in_department("delivery")
                    .assigned_to(&["usr-employee"]),
            ),
            (
                Module::Projects,
                Record::new("prj-2", "Client portal build", "usr-client")
                    .in_department("delivery")
                    .assigned_to(&["usr-projects"]),
            ),
            (
                Module::Projects,
                Record::new("prj-3", "Office move", "usr-admin").in_department("operations"),
            ),
            (
                Module::Finance,
                Record::new("fin-1", "Invoice INV-1001", "usr-client").in_department("finance"),
            ),
            (
                Module::Finance,
                Record::new("fin-2", "Supplier bill BILL-77", "usr-vendor").in_department("finance"),
            ),
            (
                Module::Finance,
                Record::new("fin-3", "Quarterly ledger close", "usr-finance")
                    .in_department("finance"),
            ),
            (
                Module::Quotations,
                Record::new("quo-1", "Quote Q-2001 for Acme", "usr-sales-rep")
                    .in_department("sales")
                    .assigned_to(&["usr-client"]),
            ),
            (
                Module::Quotations,
                Record::new("quo-2", "Quote request from client", "usr-client")
                    .in_department("sales"),
            ),
            (
                Module::Hr,
                Record::new("hr-1", "Leave request", "usr-employee")
                    .in_department("delivery")
                    .assigned_to(&["usr-projects"]),
            ),
            (
                Module::Hr,
                Record::new("hr-2", "Payroll adjustment", "usr-hr").in_department("people"),
            ),
            (
                Module::Hr,
                Record::new("hr-3", "Onboarding checklist", "usr-hr").in_department("people"),
            ),
            (
                Module::Reports,
                Record::new("rpt-1", "Sales pipeline report", "usr-sales-mgr").in_department("sales"),
            ),
            (
                Module::Reports,
                Record::new("rpt-2", "Cash flow report", "usr-finance").in_department("finance"),
            ),
            (
                Module::Settings,
                Record::new("set-1", "Tax rates", "usr-admin"),
            ),
        ];
        for (module, record) in seed {
            store.insert(module, record);
        }
        store
    }
}
