//! Identity removal and read-back verification

use std::sync::Arc;

use shared::models::Employee;

use super::compensation::{Compensation, StepOutcome};
use super::error::{RemovalError, RemovalStep};
use crate::db::PersonnelStore;

#[derive(Clone)]
pub struct IdentityRemover {
    store: Arc<dyn PersonnelStore>,
}

impl IdentityRemover {
    pub fn new(store: Arc<dyn PersonnelStore>) -> Self {
        Self { store }
    }

    /// Delete the employee row
    ///
    /// Reversible when a row was removed. Zero rows means the employee was
    /// already gone (a retry after success), so there is nothing to recreate.
    pub async fn delete(&self, snapshot: &Employee) -> Result<StepOutcome<u64>, RemovalError> {
        let rows = self
            .store
            .delete_employee(snapshot.id)
            .await
            .map_err(RemovalError::step(RemovalStep::DeleteEmployee))?;

        if rows == 0 {
            tracing::info!(employee_id = snapshot.id, "Employee already absent");
            return Ok(StepOutcome::Irreversible { output: 0 });
        }

        Ok(StepOutcome::Reversible {
            output: rows,
            compensation: Compensation::RecreateEmployee {
                snapshot: snapshot.clone(),
            },
        })
    }

    /// The delete call's own result is not trusted: the row must be gone
    pub async fn verify_removed(&self, employee_id: i64) -> Result<(), RemovalError> {
        let remaining = self
            .store
            .find_employee(employee_id)
            .await
            .map_err(RemovalError::step(RemovalStep::VerifyDeletion))?;

        match remaining {
            None => Ok(()),
            Some(_) => {
                tracing::warn!(employee_id, "Employee row still present after delete");
                Err(RemovalError::VerificationFailed { employee_id })
            }
        }
    }
}
