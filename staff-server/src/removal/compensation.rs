//! Compensation stack
//!
//! Each reversible step hands back a [`Compensation`] describing its inverse.
//! The stack replays them newest first; a failing entry is recorded and the
//! remaining entries still run.

use serde::Serialize;
use shared::models::Employee;

use crate::db::PersonnelStore;
use crate::db::repository::{RepoError, RepoResult};

/// Result of a forward step
#[derive(Debug)]
pub enum StepOutcome<T> {
    Reversible { output: T, compensation: Compensation },
    Irreversible { output: T },
}

impl<T> StepOutcome<T> {
    pub fn output(&self) -> &T {
        match self {
            Self::Reversible { output, .. } | Self::Irreversible { output } => output,
        }
    }

    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Reversible { .. })
    }

    pub fn into_parts(self) -> (T, Option<Compensation>) {
        match self {
            Self::Reversible { output, compensation } => (output, Some(compensation)),
            Self::Irreversible { output } => (output, None),
        }
    }
}

/// Inverse of a completed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Point the listed work items back at their original owner
    RestoreWorkItemOwner { work_item_ids: Vec<i64>, owner_id: i64 },
    /// Re-insert the employee with its original id and `created_at`
    RecreateEmployee { snapshot: Employee },
}

impl Compensation {
    pub fn describe(&self) -> String {
        match self {
            Self::RestoreWorkItemOwner {
                work_item_ids,
                owner_id,
            } => format!(
                "restore owner of {} work item(s) to employee {owner_id}",
                work_item_ids.len()
            ),
            Self::RecreateEmployee { snapshot } => format!("recreate employee {}", snapshot.id),
        }
    }

    pub async fn run(&self, store: &dyn PersonnelStore) -> RepoResult<()> {
        let now = shared::util::now_millis();
        match self {
            Self::RestoreWorkItemOwner {
                work_item_ids,
                owner_id,
            } => {
                let restored = store
                    .restore_work_item_owner(work_item_ids, *owner_id, now)
                    .await?;
                if restored < work_item_ids.len() as u64 {
                    return Err(RepoError::NotFound(format!(
                        "only {restored} of {} work items could be restored",
                        work_item_ids.len()
                    )));
                }
                Ok(())
            }
            Self::RecreateEmployee { snapshot } => {
                let restored = Employee {
                    is_active: true,
                    updated_at: now,
                    ..snapshot.clone()
                };
                match store.insert_employee(&restored).await {
                    Ok(()) => Ok(()),
                    // The delete never took effect; the row is still there
                    Err(RepoError::Duplicate(msg)) => match store.find_employee(snapshot.id).await? {
                        Some(_) => Ok(()),
                        None => Err(RepoError::Duplicate(msg)),
                    },
                    Err(e) => Err(e),
                }
            }
        }
    }
}

/// A compensation that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompensationFailure {
    pub action: String,
    pub error: String,
}

impl std::fmt::Display for CompensationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.action, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnwindReport {
    pub attempted: usize,
    pub failures: Vec<CompensationFailure>,
}

impl UnwindReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// LIFO list of pending compensations, owned by one removal run
#[derive(Debug, Default)]
pub struct CompensationStack {
    entries: Vec<Compensation>,
}

impl CompensationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, compensation: Compensation) {
        tracing::debug!(action = %compensation.describe(), "Compensation registered");
        self.entries.push(compensation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop and run every entry, newest first
    pub async fn unwind(&mut self, store: &dyn PersonnelStore) -> UnwindReport {
        let mut report = UnwindReport::default();

        while let Some(compensation) = self.entries.pop() {
            report.attempted += 1;
            let action = compensation.describe();
            match compensation.run(store).await {
                Ok(()) => tracing::info!(action = %action, "Compensation applied"),
                Err(e) => {
                    tracing::error!(action = %action, error = %e, "Compensation failed");
                    report.failures.push(CompensationFailure {
                        action,
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
