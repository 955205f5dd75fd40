//! Audit Trail Model
//!
//! Append-only. Entries are written once and never updated.

use serde::{Deserialize, Serialize};

/// Audit action code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AuditAction {
    /// Dependent work items re-pointed to another employee
    WorkItemsTransferred,
    /// Dependent work items permanently deleted
    WorkItemsDeleted,
    /// Events created by the employee purged
    EventsPurged,
    /// Employee record removed
    EmployeeDeleted,
    /// Removal failed and compensations restored the previous state
    EmployeeRemovalRolledBack,
    /// Removal failed and at least one compensation failed as well
    EmployeeRemovalCompensationFailed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkItemsTransferred => "work_items_transferred",
            Self::WorkItemsDeleted => "work_items_deleted",
            Self::EventsPurged => "events_purged",
            Self::EmployeeDeleted => "employee_deleted",
            Self::EmployeeRemovalRolledBack => "employee_removal_rolled_back",
            Self::EmployeeRemovalCompensationFailed => "employee_removal_compensation_failed",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditEntry {
    pub id: i64,
    /// Who did it (operator label)
    pub actor: String,
    pub action: AuditAction,
    /// Target table, e.g. "employee"
    pub table_name: String,
    pub target_id: String,
    /// Free-form structured details
    #[cfg_attr(feature = "db", sqlx(json))]
    pub details: serde_json::Value,
    pub created_at: i64,
}

/// Insert payload for a new audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntryCreate {
    pub actor: String,
    pub action: AuditAction,
    pub table_name: String,
    pub target_id: String,
    pub details: serde_json::Value,
    pub created_at: i64,
}
