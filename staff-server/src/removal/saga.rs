//! Removal saga controller
//!
//! Drives one employee removal through the [`RemovalState`] machine:
//!
//! 1. validate (lock, transfer target, admin floor)
//! 2. transfer or delete dependent work items
//! 3. purge events
//! 4. delete the employee, then read back to verify
//!
//! Every reversible step pushes its inverse onto a [`CompensationStack`]. Any
//! failure after validation unwinds that stack newest first. Deleted work
//! items and purged events are not restored.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use shared::error::ErrorCode;
use shared::models::{
    AuditAction, DependentAction, Employee, EmployeeRemovalRequest, RemovalOutcome,
};

use super::compensation::{CompensationStack, StepOutcome, UnwindReport};
use super::dependents::DependentResolver;
use super::error::RemovalError;
use super::events::EventPurger;
use super::guard::{AdminFloorGuard, FloorClearance, RemovalLocks, resolve_transfer_target};
use super::identity::IdentityRemover;
use super::state::{RemovalState, StateTransition};
use crate::audit::AuditRecorder;
use crate::db::PersonnelStore;

const EMPLOYEE_TABLE: &str = "employee";

/// Everything one run produced, for in-process callers
#[derive(Debug, Clone, Serialize)]
pub struct RemovalReport {
    pub outcome: RemovalOutcome,
    pub final_state: RemovalState,
    pub trace: Vec<StateTransition>,
    /// Code of the failure, `None` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    /// Present when a rollback ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unwind: Option<UnwindReport>,
}

impl RemovalReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.success
    }
}

/// Per-call state: owned by exactly one `execute`
struct SagaRun {
    employee_id: i64,
    state: RemovalState,
    trace: Vec<StateTransition>,
    compensations: CompensationStack,
    notices: Vec<String>,
    affected_work_items: u64,
    deleted_events: u64,
    // descriptions of mutations that a rollback cannot undo
    irreversible: Vec<String>,
    // identity step found no row: an earlier run already finished
    already_removed: bool,
}

/// What validation hands to the steps
struct Validated {
    /// Stored record when present, otherwise the caller's snapshot
    employee: Employee,
    target: Option<Employee>,
    // held until the run ends
    _floor: FloorClearance,
}

impl SagaRun {
    fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            state: RemovalState::Validating,
            trace: Vec::new(),
            compensations: CompensationStack::new(),
            notices: Vec::new(),
            affected_work_items: 0,
            deleted_events: 0,
            irreversible: Vec::new(),
            already_removed: false,
        }
    }

    fn advance(&mut self, next: RemovalState) {
        let from = self.state;
        debug_assert!(
            from.can_transition_to(next),
            "illegal removal transition {from} -> {next}"
        );
        if !from.can_transition_to(next) {
            tracing::error!(employee_id = self.employee_id, %from, to = %next, "Illegal removal transition");
            return;
        }

        tracing::info!(employee_id = self.employee_id, %from, to = %next, "Removal state changed");
        self.trace.push(StateTransition {
            from,
            to: next,
            at: shared::util::now_millis(),
        });
        self.state = next;
    }

    fn register<T>(&mut self, outcome: StepOutcome<T>) -> T {
        let (output, compensation) = outcome.into_parts();
        if let Some(compensation) = compensation {
            self.compensations.push(compensation);
        }
        output
    }

    fn into_report(
        self,
        outcome: RemovalOutcome,
        error_code: Option<ErrorCode>,
        unwind: Option<UnwindReport>,
    ) -> RemovalReport {
        RemovalReport {
            outcome,
            final_state: self.state,
            trace: self.trace,
            error_code,
            unwind,
        }
    }
}

/// Orchestrates employee removal
#[derive(Clone)]
pub struct EmployeeRemover {
    store: Arc<dyn PersonnelStore>,
    dependents: DependentResolver,
    events: EventPurger,
    identity: IdentityRemover,
    audit: AuditRecorder,
    locks: RemovalLocks,
    default_actor: String,
}

impl EmployeeRemover {
    pub fn new(store: Arc<dyn PersonnelStore>, default_actor: impl Into<String>) -> Self {
        Self {
            dependents: DependentResolver::new(store.clone()),
            events: EventPurger::new(store.clone()),
            identity: IdentityRemover::new(store.clone()),
            audit: AuditRecorder::new(store.clone()),
            locks: RemovalLocks::new(),
            default_actor: default_actor.into(),
            store,
        }
    }

    pub fn locks(&self) -> &RemovalLocks {
        &self.locks
    }

    /// Re-run a removal from `Validating`
    ///
    /// Safe after a success: the missing employee counts as already removed.
    pub async fn retry(&self, request: EmployeeRemovalRequest) -> RemovalReport {
        tracing::info!(employee_id = request.employee.id, "Retrying employee removal");
        self.execute(request).await
    }

    pub async fn execute(&self, request: EmployeeRemovalRequest) -> RemovalReport {
        let employee = &request.employee;
        let actor = request
            .actor
            .clone()
            .unwrap_or_else(|| self.default_actor.clone());
        let mut run = SagaRun::new(employee.id);

        tracing::info!(
            employee_id = employee.id,
            action = ?request.action,
            actor = %actor,
            "Employee removal requested"
        );

        let Some(_lease) = self.locks.try_acquire(employee.id) else {
            return self.reject(run, RemovalError::RemovalInProgress(employee.id));
        };

        let validated = match self.validate(&request).await {
            Ok(validated) => validated,
            Err(e) => return self.reject(run, e),
        };
        let employee = &validated.employee;

        if request.action == DependentAction::Delete {
            run.notices.push(
                "Delete mode: work items and events are removed permanently and are not restored if the removal fails"
                    .to_string(),
            );
        }

        match self
            .run_steps(&mut run, employee, validated.target.as_ref(), &actor)
            .await
        {
            Ok(()) => self.finish(run, employee, &actor).await,
            Err(cause) => self.roll_back(run, employee, &actor, cause).await,
        }
    }

    async fn validate(&self, request: &EmployeeRemovalRequest) -> Result<Validated, RemovalError> {
        let target = match request.action {
            DependentAction::Transfer => Some(
                resolve_transfer_target(
                    self.store.as_ref(),
                    &request.employee,
                    request.target_employee.as_ref(),
                )
                .await?,
            ),
            DependentAction::Delete => None,
        };

        let floor = AdminFloorGuard::check(self.store.as_ref(), &self.locks, &request.employee).await?;
        let employee = floor
            .current
            .clone()
            .unwrap_or_else(|| request.employee.clone());
        Ok(Validated {
            employee,
            target,
            _floor: floor,
        })
    }

    async fn run_steps(
        &self,
        run: &mut SagaRun,
        employee: &Employee,
        target: Option<&Employee>,
        actor: &str,
    ) -> Result<(), RemovalError> {
        run.advance(RemovalState::TransferringOrDeletingWorkItems);
        match target {
            Some(target) => {
                let moved = run.register(self.dependents.transfer(employee.id, target.id).await?);
                run.affected_work_items = moved.len() as u64;
                if !moved.is_empty() {
                    run.notices.push(format!(
                        "{} work item(s) transferred to {}",
                        moved.len(),
                        target.label()
                    ));
                    self.audit
                        .record(
                            actor,
                            AuditAction::WorkItemsTransferred,
                            EMPLOYEE_TABLE,
                            employee.id,
                            json!({
                                "from": employee.id,
                                "to": target.id,
                                "count": moved.len(),
                                "work_item_ids": moved,
                            }),
                        )
                        .await;
                }
            }
            None => {
                let deleted = run.register(self.dependents.delete(employee.id).await?);
                run.affected_work_items = deleted;
                if deleted > 0 {
                    run.irreversible.push(format!("{deleted} work item(s) deleted"));
                    run.notices.push(format!("{deleted} work item(s) deleted"));
                    self.audit
                        .record(
                            actor,
                            AuditAction::WorkItemsDeleted,
                            EMPLOYEE_TABLE,
                            employee.id,
                            json!({ "count": deleted }),
                        )
                        .await;
                }
            }
        }

        run.advance(RemovalState::PurgingEvents);
        let purged = run.register(self.events.purge(employee.id).await?);
        run.deleted_events = purged;
        if purged > 0 {
            run.irreversible.push(format!("{purged} event(s) deleted"));
            run.notices.push(format!("{purged} event(s) deleted"));
            self.audit
                .record(
                    actor,
                    AuditAction::EventsPurged,
                    EMPLOYEE_TABLE,
                    employee.id,
                    json!({ "count": purged }),
                )
                .await;
        }

        run.advance(RemovalState::RemovingIdentity);
        let rows = run.register(self.identity.delete(employee).await?);
        if rows == 0 {
            run.already_removed = true;
            run.notices
                .push(format!("{} was already removed", employee.label()));
        }

        run.advance(RemovalState::Verifying);
        self.identity.verify_removed(employee.id).await
    }

    async fn finish(&self, mut run: SagaRun, employee: &Employee, actor: &str) -> RemovalReport {
        run.advance(RemovalState::Succeeded);

        if run.already_removed {
            tracing::info!(employee_id = employee.id, "Employee removal already complete");
            let outcome = RemovalOutcome::succeeded(
                run.affected_work_items,
                run.deleted_events,
                std::mem::take(&mut run.notices),
            );
            return run.into_report(outcome, None, None);
        }

        run.notices.push(format!("{} removed", employee.label()));

        self.audit
            .record(
                actor,
                AuditAction::EmployeeDeleted,
                EMPLOYEE_TABLE,
                employee.id,
                json!({
                    "employee": employee,
                    "affected_work_items": run.affected_work_items,
                    "deleted_events": run.deleted_events,
                }),
            )
            .await;

        tracing::info!(
            employee_id = employee.id,
            affected_work_items = run.affected_work_items,
            deleted_events = run.deleted_events,
            "Employee removed"
        );

        let outcome = RemovalOutcome::succeeded(
            run.affected_work_items,
            run.deleted_events,
            std::mem::take(&mut run.notices),
        );
        run.into_report(outcome, None, None)
    }

    async fn roll_back(
        &self,
        mut run: SagaRun,
        employee: &Employee,
        actor: &str,
        cause: RemovalError,
    ) -> RemovalReport {
        tracing::warn!(
            employee_id = employee.id,
            state = %run.state,
            error = %cause,
            pending = run.compensations.len(),
            "Removal step failed, rolling back"
        );

        run.advance(RemovalState::RollingBack);
        let unwind = run.compensations.unwind(self.store.as_ref()).await;
        run.advance(RemovalState::Failed);

        if !run.irreversible.is_empty() {
            run.notices.push(format!(
                "Not restored: {}",
                run.irreversible.join(", ")
            ));
        }

        let error = if unwind.is_clean() {
            self.audit
                .record(
                    actor,
                    AuditAction::EmployeeRemovalRolledBack,
                    EMPLOYEE_TABLE,
                    employee.id,
                    json!({
                        "cause": cause.to_string(),
                        "compensations": unwind.attempted,
                        "not_restored": run.irreversible,
                    }),
                )
                .await;
            cause
        } else {
            tracing::error!(
                employee_id = employee.id,
                error = %cause,
                failed = unwind.failures.len(),
                "Rollback incomplete, manual repair required"
            );
            self.audit
                .record(
                    actor,
                    AuditAction::EmployeeRemovalCompensationFailed,
                    EMPLOYEE_TABLE,
                    employee.id,
                    json!({
                        "cause": cause.to_string(),
                        "failures": unwind.failures,
                        "not_restored": run.irreversible,
                    }),
                )
                .await;
            RemovalError::CompensationFailed {
                cause: Box::new(cause),
                failures: unwind.failures.clone(),
            }
        };

        let outcome = RemovalOutcome::failed(
            error.kind(),
            error.user_message(),
            std::mem::take(&mut run.notices),
        );
        run.into_report(outcome, Some(error.code()), Some(unwind))
    }

    fn reject(&self, mut run: SagaRun, error: RemovalError) -> RemovalReport {
        tracing::warn!(employee_id = run.employee_id, error = %error, "Employee removal rejected");
        run.advance(RemovalState::Failed);
        let outcome = RemovalOutcome::failed(error.kind(), error.user_message(), Vec::new());
        run.into_report(outcome, Some(error.code()), None)
    }
}
