//! Impact preview
//!
//! Counts shown to the operator before a strategy is chosen. Advisory only:
//! a failed read degrades to zero instead of erroring.

use std::sync::Arc;

use shared::models::ImpactSummary;

use crate::db::PersonnelStore;

#[derive(Clone)]
pub struct ImpactAnalyzer {
    store: Arc<dyn PersonnelStore>,
}

impl ImpactAnalyzer {
    pub fn new(store: Arc<dyn PersonnelStore>) -> Self {
        Self { store }
    }

    pub async fn analyze(&self, employee_id: i64) -> ImpactSummary {
        let work_items = self
            .store
            .count_work_items_by_employee(employee_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(employee_id, error = %e, "Failed to count work items, reporting 0");
                0
            });

        let events = self
            .store
            .count_events_by_creator(employee_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(employee_id, error = %e, "Failed to count events, reporting 0");
                0
            });

        ImpactSummary::new(employee_id, work_items, events)
    }
}
