//! Data-visibility scopes.
//!
//! A role's [`DataScope`] bounds which records it may see, independent of
//! its module permissions. Records expose ownership through
//! [`ScopedRecord`]; [`filter_visible`] applies a scope to a slice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Breadth of records a role may view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    /// Every record.
    Global,
    /// Records belonging to the viewer's department.
    Department,
    /// Records assigned to (or owned by) the viewer.
    Assigned,
    /// Records owned by the viewer.
    Own,
}

impl DataScope {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataScope::Global => "global",
            DataScope::Department => "department",
            DataScope::Assigned => "assigned",
            DataScope::Own => "own",
        }
    }

    /// Whether `viewer` may see `record` under this scope.
    ///
    /// A `Department` viewer without a department only sees records it owns.
    pub fn permits<R: ScopedRecord + ?Sized>(&self, viewer: &Viewer, record: &R) -> bool {
        let owns = record.owner() == viewer.subject;
        match self {
            DataScope::Global => true,
            DataScope::Department => match (&viewer.department, record.department()) {
                (Some(mine), Some(theirs)) => mine == theirs,
                _ => owns,
            },
            DataScope::Assigned => owns || record.assignees().iter().any(|a| *a == viewer.subject),
            DataScope::Own => owns,
        }
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a scope is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Subject identifier of the viewing user.
    pub subject: String,
    /// Department of the viewing user, if any.
    pub department: Option<String>,
}

impl Viewer {
    /// Create a viewer with no department.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            department: None,
        }
    }

    /// Set the viewer's department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// A record whose visibility is bounded by a [`DataScope`].
pub trait ScopedRecord {
    /// Subject id of the record owner.
    fn owner(&self) -> &str;

    /// Department the record belongs to.
    fn department(&self) -> Option<&str>;

    /// Subject ids the record is assigned to.
    fn assignees(&self) -> &[String] {
        &[]
    }
}

/// Keep the records `viewer` may see.
///
/// `None` means the role has no matrix entry, so nothing is visible.
pub fn filter_visible<'a, R: ScopedRecord>(
    scope: Option<DataScope>,
    viewer: &Viewer,
    records: &'a [R],
) -> Vec<&'a R> {
    let Some(scope) = scope else {
        log::debug!("No data scope for '{}', hiding all records", viewer.subject);
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| scope.permits(viewer, *r))
        .collect()
}
