use std::sync::Arc;

use serde_json::Value;
use shared::models::{AuditAction, AuditEntryCreate};

use crate::db::PersonnelStore;

/// Best-effort audit writer
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn PersonnelStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn PersonnelStore>) -> Self {
        Self { store }
    }

    /// Record one milestone against `table_name:target_id`
    ///
    /// Returns whether the entry reached the store. Failures are swallowed.
    pub async fn record(
        &self,
        actor: &str,
        action: AuditAction,
        table_name: &str,
        target_id: impl ToString,
        details: Value,
    ) -> bool {
        let entry = AuditEntryCreate {
            actor: actor.to_string(),
            action,
            table_name: table_name.to_string(),
            target_id: target_id.to_string(),
            details,
            created_at: shared::util::now_millis(),
        };

        let resource = format!("{}:{}", entry.table_name, entry.target_id);
        let details = entry.details.to_string();

        match self.store.insert_audit_entry(entry).await {
            Ok(()) => {
                crate::audit_log!(actor, action.as_str(), resource.as_str(), details.as_str());
                true
            }
            Err(e) => {
                tracing::error!(
                    target: "audit",
                    actor = %actor,
                    action = %action,
                    resource = %resource,
                    details = %details,
                    error = %e,
                    "Failed to persist audit entry"
                );
                false
            }
        }
    }
}
