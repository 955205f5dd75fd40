//! Dependent work items: transfer or delete

use std::sync::Arc;

use super::compensation::{Compensation, StepOutcome};
use super::error::{RemovalError, RemovalStep};
use crate::db::PersonnelStore;

#[derive(Clone)]
pub struct DependentResolver {
    store: Arc<dyn PersonnelStore>,
}

impl DependentResolver {
    pub fn new(store: Arc<dyn PersonnelStore>) -> Self {
        Self { store }
    }

    /// Re-point every work item of `from` to `to`
    ///
    /// Output is the list of moved ids. The compensation points exactly
    /// those ids back at `from`.
    pub async fn transfer(&self, from: i64, to: i64) -> Result<StepOutcome<Vec<i64>>, RemovalError> {
        let moved = self
            .store
            .reassign_work_items(from, to, shared::util::now_millis())
            .await
            .map_err(RemovalError::step(RemovalStep::TransferWorkItems))?;

        tracing::info!(from, to, count = moved.len(), "Work items transferred");

        if moved.is_empty() {
            return Ok(StepOutcome::Irreversible { output: moved });
        }
        Ok(StepOutcome::Reversible {
            compensation: Compensation::RestoreWorkItemOwner {
                work_item_ids: moved.clone(),
                owner_id: from,
            },
            output: moved,
        })
    }

    /// Permanently delete every work item of `employee_id`
    pub async fn delete(&self, employee_id: i64) -> Result<StepOutcome<u64>, RemovalError> {
        let deleted = self
            .store
            .delete_work_items_by_employee(employee_id)
            .await
            .map_err(RemovalError::step(RemovalStep::DeleteWorkItems))?;

        tracing::info!(employee_id, count = deleted, "Work items deleted");
        Ok(StepOutcome::Irreversible { output: deleted })
    }
}
