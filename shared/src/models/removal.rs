//! Employee removal DTOs
//!
//! Request/response shapes for the cascade removal of an employee and the
//! impact preview shown before the operator picks a strategy.

use serde::{Deserialize, Serialize};

use super::employee::Employee;

/// What happens to the employee's work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependentAction {
    /// Re-assign every work item to another active employee
    Transfer,
    /// Permanently delete every work item (irreversible)
    Delete,
}

impl DependentAction {
    /// Whether a failure after this step can fully restore the work items
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Transfer)
    }
}

/// In-process removal request
///
/// `employee` is the full current snapshot; it is what a rollback recreates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRemovalRequest {
    pub employee: Employee,
    pub action: DependentAction,
    /// Required iff `action == Transfer`
    pub target_employee: Option<Employee>,
    /// Actor label for the audit trail
    #[serde(default)]
    pub actor: Option<String>,
}

impl EmployeeRemovalRequest {
    pub fn delete(employee: Employee) -> Self {
        Self {
            employee,
            action: DependentAction::Delete,
            target_employee: None,
            actor: None,
        }
    }

    pub fn transfer(employee: Employee, target: Employee) -> Self {
        Self {
            employee,
            action: DependentAction::Transfer,
            target_employee: Some(target),
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// HTTP payload for `DELETE /api/employees/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveEmployeePayload {
    pub action: DependentAction,
    #[serde(default)]
    pub target_employee_id: Option<i64>,
    #[serde(default)]
    pub operator: Option<String>,
}

/// Why a removal did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before anything was mutated
    Precondition,
    /// A step failed and every reversible step was undone
    RolledBack,
    /// A step failed and the rollback failed too; manual repair needed
    CompensationFailed,
}

/// Result of one removal run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Work items transferred or deleted
    #[serde(default)]
    pub affected_work_items: u64,
    #[serde(default)]
    pub deleted_events: u64,
    /// Informational notifications for the operator
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl RemovalOutcome {
    pub fn succeeded(affected_work_items: u64, deleted_events: u64, notices: Vec<String>) -> Self {
        Self {
            success: true,
            error: None,
            failure: None,
            affected_work_items,
            deleted_events,
            notices,
        }
    }

    pub fn failed(kind: FailureKind, error: impl Into<String>, notices: Vec<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            failure: Some(kind),
            affected_work_items: 0,
            deleted_events: 0,
            notices,
        }
    }
}

/// Dependent record counts for an employee (advisory)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub employee_id: i64,
    pub work_items: u64,
    pub events: u64,
    pub total: u64,
}

impl ImpactSummary {
    pub fn new(employee_id: i64, work_items: u64, events: u64) -> Self {
        Self {
            employee_id,
            work_items,
            events,
            total: work_items + events,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
