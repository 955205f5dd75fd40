//! Event purge

use std::sync::Arc;

use super::compensation::StepOutcome;
use super::error::{RemovalError, RemovalStep};
use crate::db::PersonnelStore;

#[derive(Clone)]
pub struct EventPurger {
    store: Arc<dyn PersonnelStore>,
}

impl EventPurger {
    pub fn new(store: Arc<dyn PersonnelStore>) -> Self {
        Self { store }
    }

    /// Delete every event created by `employee_id`. Never compensated.
    pub async fn purge(&self, employee_id: i64) -> Result<StepOutcome<u64>, RemovalError> {
        let deleted = self
            .store
            .delete_events_by_creator(employee_id)
            .await
            .map_err(RemovalError::step(RemovalStep::PurgeEvents))?;

        tracing::info!(employee_id, count = deleted, "Events purged");
        Ok(StepOutcome::Irreversible { output: deleted })
    }
}
