mod common;

use common::{Fixture, Op};
use shared::error::ErrorCode;
use shared::models::{AuditAction, EmployeeRemovalRequest, EmployeeRole, FailureKind};
use staff_server::db::repository::{audit_log, employee};
use staff_server::removal::{ImpactAnalyzer, RemovalState};

async fn audit_actions(fx: &Fixture, employee_id: i64) -> Vec<AuditAction> {
    audit_log::find_by_target(&fx.db.pool, "employee", &employee_id.to_string())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect()
}

fn states(report: &staff_server::RemovalReport) -> Vec<RemovalState> {
    let mut path = vec![RemovalState::Validating];
    path.extend(report.trace.iter().map(|t| t.to));
    path
}

// ========== Happy paths ==========

#[tokio::test]
async fn delete_mode_removes_employee_work_items_and_events() {
    let fx = Fixture::new().await;
    let a = fx.employee("ayu", EmployeeRole::User).await;
    let other = fx.employee("budi", EmployeeRole::User).await;
    fx.work_items(a.id, 3).await;
    let kept = fx.work_items(other.id, 1).await;
    fx.event(a.id, vec![other.id]).await;

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(a.clone())).await;

    assert!(report.outcome.success, "{:?}", report.outcome);
    assert_eq!(report.outcome.error, None);
    assert_eq!(report.outcome.affected_work_items, 3);
    assert_eq!(report.outcome.deleted_events, 1);
    assert_eq!(report.final_state, RemovalState::Succeeded);
    assert!(fx.find(a.id).await.is_none());
    assert!(fx.owned_item_ids(a.id).await.is_empty());
    assert_eq!(fx.event_count(a.id).await, 0);
    assert_eq!(fx.owned_item_ids(other.id).await, vec![kept[0].id]);

    assert_eq!(
        states(&report),
        vec![
            RemovalState::Validating,
            RemovalState::TransferringOrDeletingWorkItems,
            RemovalState::PurgingEvents,
            RemovalState::RemovingIdentity,
            RemovalState::Verifying,
            RemovalState::Succeeded,
        ]
    );
    assert_eq!(
        audit_actions(&fx, a.id).await,
        vec![
            AuditAction::WorkItemsDeleted,
            AuditAction::EventsPurged,
            AuditAction::EmployeeDeleted
        ]
    );
}

#[tokio::test]
async fn transfer_mode_moves_every_work_item_to_target() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    let items = fx.work_items(b.id, 2).await;

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c.clone()).with_actor("hr-lead"))
        .await;

    assert!(report.outcome.success, "{:?}", report.outcome);
    assert_eq!(report.outcome.affected_work_items, 2);
    let mut expected: Vec<i64> = items.iter().map(|w| w.id).collect();
    expected.sort();
    assert_eq!(fx.owned_item_ids(c.id).await, expected);
    assert!(fx.owned_item_ids(b.id).await.is_empty());
    assert!(fx.find(b.id).await.is_none());
    assert!(fx.find(c.id).await.is_some());
    assert!(
        report
            .outcome
            .notices
            .iter()
            .any(|n| n.contains("2 work item(s) transferred"))
    );

    let entries = audit_log::find_by_target(&fx.db.pool, "employee", &b.id.to_string())
        .await
        .unwrap();
    assert_eq!(entries[0].action, AuditAction::WorkItemsTransferred);
    assert_eq!(entries[0].actor, "hr-lead");
    assert_eq!(entries[0].details["to"], c.id);
}

#[tokio::test]
async fn transfer_with_no_work_items_is_a_no_op_step() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c))
        .await;

    assert!(report.outcome.success);
    assert_eq!(report.outcome.affected_work_items, 0);
    assert!(fx.find(b.id).await.is_none());
    assert_eq!(audit_actions(&fx, b.id).await, vec![AuditAction::EmployeeDeleted]);
}

// ========== Rollback ==========

#[tokio::test]
async fn failed_identity_delete_restores_transferred_work_items() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    let items = fx.work_items(b.id, 2).await;
    fx.store.fail(Op::DeleteEmployee);

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c.clone()))
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.failure, Some(FailureKind::RolledBack));
    assert_eq!(report.error_code, Some(ErrorCode::RemovalRolledBack));
    let error = report.outcome.error.clone().unwrap();
    assert!(error.starts_with("Operation cancelled, data restored"), "{error}");

    let mut expected: Vec<i64> = items.iter().map(|w| w.id).collect();
    expected.sort();
    assert_eq!(fx.owned_item_ids(b.id).await, expected);
    assert!(fx.owned_item_ids(c.id).await.is_empty());
    assert_eq!(fx.find(b.id).await, Some(b.clone()));

    assert_eq!(report.final_state, RemovalState::Failed);
    assert!(states(&report).contains(&RemovalState::RollingBack));
    let unwind = report.unwind.unwrap();
    assert_eq!(unwind.attempted, 1);
    assert!(unwind.is_clean());
    assert_eq!(
        audit_actions(&fx, b.id).await,
        vec![
            AuditAction::WorkItemsTransferred,
            AuditAction::EmployeeRemovalRolledBack
        ]
    );
}

#[tokio::test]
async fn failed_verification_read_recreates_deleted_employee() {
    let fx = Fixture::new().await;
    let a = fx.employee("ayu", EmployeeRole::User).await;
    fx.work_items(a.id, 2).await;
    fx.event(a.id, vec![]).await;
    // The guard's read succeeds; the verification read fails
    fx.store.fail_after(Op::FindEmployee, 1);

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(a.clone())).await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.failure, Some(FailureKind::RolledBack));

    let restored = fx.find(a.id).await.expect("employee recreated");
    assert_eq!(restored.id, a.id);
    assert_eq!(restored.created_at, a.created_at);
    assert_eq!(restored.full_name, a.full_name);
    assert_eq!(restored.personnel_number, a.personnel_number);
    assert_eq!(restored.username, a.username);
    assert_eq!(restored.role, a.role);
    assert!(restored.is_active);

    // Delete mode is not covered by the rollback
    assert!(fx.owned_item_ids(a.id).await.is_empty());
    assert_eq!(fx.event_count(a.id).await, 0);
    assert!(
        report
            .outcome
            .notices
            .iter()
            .any(|n| n.starts_with("Not restored: 2 work item(s) deleted, 1 event(s) deleted"))
    );
}

#[tokio::test]
async fn event_purge_failure_rolls_back_transfer() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    fx.work_items(b.id, 3).await;
    fx.event(b.id, vec![]).await;
    fx.store.fail(Op::DeleteEvents);

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c.clone()))
        .await;

    assert_eq!(report.outcome.failure, Some(FailureKind::RolledBack));
    assert_eq!(fx.owned_item_ids(b.id).await.len(), 3);
    assert_eq!(fx.event_count(b.id).await, 1);
    assert_eq!(fx.find(b.id).await, Some(b));
    assert_eq!(
        states(&report),
        vec![
            RemovalState::Validating,
            RemovalState::TransferringOrDeletingWorkItems,
            RemovalState::PurgingEvents,
            RemovalState::RollingBack,
            RemovalState::Failed,
        ]
    );
    assert!(!fx.store.mutations().contains(&Op::DeleteEmployee));
}

#[tokio::test]
async fn phantom_delete_is_caught_by_verification() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    fx.work_items(b.id, 2).await;
    fx.store.phantom_delete();

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c.clone()))
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.failure, Some(FailureKind::RolledBack));
    assert!(
        report
            .outcome
            .error
            .as_deref()
            .unwrap()
            .contains("still exists after deletion")
    );
    assert_eq!(fx.owned_item_ids(b.id).await.len(), 2);
    assert!(fx.owned_item_ids(c.id).await.is_empty());
    assert_eq!(fx.find(b.id).await, Some(b));
    assert!(report.unwind.unwrap().is_clean());
}

#[tokio::test]
async fn failing_compensation_is_reported_as_critical() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    fx.work_items(b.id, 2).await;
    fx.store.fail(Op::DeleteEmployee);
    fx.store.fail(Op::RestoreWorkItemOwner);

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c.clone()))
        .await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.failure, Some(FailureKind::CompensationFailed));
    assert_eq!(report.error_code, Some(ErrorCode::RemovalCompensationFailed));
    let error = report.outcome.error.clone().unwrap();
    assert!(
        error.starts_with("Critical error, contact an administrator"),
        "{error}"
    );
    let unwind = report.unwind.unwrap();
    assert_eq!(unwind.failures.len(), 1);
    // Work items are stuck with the target until someone repairs them
    assert_eq!(fx.owned_item_ids(c.id).await.len(), 2);
    assert!(
        audit_actions(&fx, b.id)
            .await
            .contains(&AuditAction::EmployeeRemovalCompensationFailed)
    );
}

// ========== Audit ==========

#[tokio::test]
async fn audit_failures_do_not_change_outcomes() {
    async fn run(fail_audit: bool, fail_delete: bool) -> shared::models::RemovalOutcome {
        let fx = Fixture::new().await;
        let b = fx.employee("bayu", EmployeeRole::User).await;
        let c = fx.employee("citra", EmployeeRole::User).await;
        fx.work_items(b.id, 2).await;
        fx.event(b.id, vec![]).await;
        if fail_audit {
            fx.store.fail(Op::InsertAudit);
        }
        if fail_delete {
            fx.store.fail(Op::DeleteEmployee);
        }
        let report = fx
            .remover
            .execute(EmployeeRemovalRequest::transfer(b.clone(), c))
            .await;
        if fail_audit {
            assert!(audit_actions(&fx, b.id).await.is_empty());
        }
        let mut outcome = report.outcome;
        // labels embed generated ids
        outcome.notices.clear();
        outcome.error = outcome.error.map(|e| e.split(':').next().unwrap_or_default().to_string());
        outcome
    }

    assert_eq!(run(true, false).await, run(false, false).await);
    assert!(run(true, false).await.success);
    assert_eq!(run(true, true).await, run(false, true).await);
    assert_eq!(run(true, true).await.failure, Some(FailureKind::RolledBack));
}

// ========== Preconditions ==========

#[tokio::test]
async fn last_active_admin_cannot_be_removed() {
    let fx = Fixture::new().await;
    let d = fx.employee("dewi", EmployeeRole::Admin).await;
    fx.employee("eko", EmployeeRole::User).await;
    fx.work_items(d.id, 2).await;
    fx.event(d.id, vec![]).await;

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(d.clone())).await;

    assert!(!report.outcome.success);
    assert_eq!(report.outcome.failure, Some(FailureKind::Precondition));
    assert_eq!(report.error_code, Some(ErrorCode::LastActiveAdmin));
    assert!(fx.store.mutations().is_empty());
    assert_eq!(fx.find(d.id).await, Some(d.clone()));
    assert_eq!(fx.owned_item_ids(d.id).await.len(), 2);
    assert_eq!(fx.event_count(d.id).await, 1);
    assert_eq!(states(&report), vec![RemovalState::Validating, RemovalState::Failed]);
    assert!(audit_actions(&fx, d.id).await.is_empty());
}

#[tokio::test]
async fn admin_can_be_removed_when_another_admin_remains() {
    let fx = Fixture::new().await;
    let d = fx.employee("dewi", EmployeeRole::Admin).await;
    fx.employee("fajar", EmployeeRole::Admin).await;

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(d.clone())).await;
    assert!(report.outcome.success);
    assert!(fx.find(d.id).await.is_none());
}

#[tokio::test]
async fn inactive_admins_do_not_count_toward_the_floor() {
    let fx = Fixture::new().await;
    let d = fx.employee("dewi", EmployeeRole::Admin).await;
    let f = fx.employee("fajar", EmployeeRole::Admin).await;
    employee::set_active(&fx.db.pool, f.id, false).await.unwrap();

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(d.clone())).await;
    assert_eq!(report.error_code, Some(ErrorCode::LastActiveAdmin));
}

#[tokio::test]
async fn concurrent_admin_removals_keep_one_admin() {
    let fx = Fixture::new().await;
    let alpha = fx.employee("alpha", EmployeeRole::Admin).await;
    let beta = fx.employee("beta", EmployeeRole::Admin).await;
    fx.employee("gita", EmployeeRole::User).await;

    let (a, b) = tokio::join!(
        fx.remover.execute(EmployeeRemovalRequest::delete(alpha.clone())),
        fx.remover.execute(EmployeeRemovalRequest::delete(beta.clone())),
    );

    let succeeded = [a.succeeded(), b.succeeded()];
    assert_eq!(succeeded.iter().filter(|ok| **ok).count(), 1);
    let blocked = if a.succeeded() { &b } else { &a };
    assert_eq!(blocked.error_code, Some(ErrorCode::LastActiveAdmin));
    assert_eq!(blocked.outcome.failure, Some(FailureKind::Precondition));
    assert_eq!(fx.active_admins().await, 1);
    assert!(!fx.remover.locks().is_admin_floor_held());
}

#[tokio::test]
async fn stale_snapshot_does_not_bypass_admin_floor() {
    let fx = Fixture::new().await;
    let alpha = fx.employee("alpha", EmployeeRole::Admin).await;
    fx.work_items(alpha.id, 1).await;

    let mut stale = alpha.clone();
    stale.role = EmployeeRole::User;
    let report = fx.remover.execute(EmployeeRemovalRequest::delete(stale)).await;

    assert_eq!(report.error_code, Some(ErrorCode::LastActiveAdmin));
    assert!(fx.store.mutations().is_empty());
    assert_eq!(fx.find(alpha.id).await, Some(alpha));
    assert_eq!(fx.active_admins().await, 1);
}

#[tokio::test]
async fn rollback_recreates_stored_record_not_snapshot() {
    let fx = Fixture::new().await;
    let alpha = fx.employee("alpha", EmployeeRole::Admin).await;
    fx.employee("beta", EmployeeRole::Admin).await;
    fx.store.fail_after(Op::FindEmployee, 2);

    let mut stale = alpha.clone();
    stale.role = EmployeeRole::User;
    stale.full_name = "Outdated Name".to_string();
    let report = fx.remover.execute(EmployeeRemovalRequest::delete(stale)).await;

    assert_eq!(report.outcome.failure, Some(FailureKind::RolledBack));
    assert_eq!(fx.find(alpha.id).await, Some(alpha));
}

#[tokio::test]
async fn unreadable_employee_record_fails_closed() {
    let fx = Fixture::new().await;
    let alpha = fx.employee("alpha", EmployeeRole::Admin).await;
    fx.store.fail(Op::FindEmployee);

    let report = fx.remover.execute(EmployeeRemovalRequest::delete(alpha.clone())).await;

    assert_eq!(report.outcome.failure, Some(FailureKind::Precondition));
    assert!(fx.store.mutations().is_empty());
    assert!(fx.find(alpha.id).await.is_some());
}

#[tokio::test]
async fn transfer_without_target_is_rejected_before_any_query() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    fx.work_items(b.id, 1).await;

    let mut request = EmployeeRemovalRequest::delete(b.clone());
    request.action = shared::models::DependentAction::Transfer;
    let report = fx.remover.execute(request).await;

    assert_eq!(report.outcome.failure, Some(FailureKind::Precondition));
    assert_eq!(report.error_code, Some(ErrorCode::TransferTargetRequired));
    assert!(fx.store.calls().is_empty());
    assert_eq!(fx.owned_item_ids(b.id).await.len(), 1);
}

#[tokio::test]
async fn transfer_to_self_is_rejected_before_any_query() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), b.clone()))
        .await;

    assert_eq!(report.error_code, Some(ErrorCode::TransferTargetInvalid));
    assert!(fx.store.calls().is_empty());
    assert!(fx.find(b.id).await.is_some());
}

#[tokio::test]
async fn transfer_to_inactive_employee_is_rejected() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    fx.work_items(b.id, 2).await;
    employee::set_active(&fx.db.pool, c.id, false).await.unwrap();

    let report = fx
        .remover
        .execute(EmployeeRemovalRequest::transfer(b.clone(), c))
        .await;

    assert_eq!(report.error_code, Some(ErrorCode::TransferTargetInvalid));
    assert!(fx.store.mutations().is_empty());
    assert_eq!(fx.owned_item_ids(b.id).await.len(), 2);
}

#[tokio::test]
async fn concurrent_removal_of_same_employee_is_rejected() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;

    let lease = fx.remover.locks().try_acquire(b.id).unwrap();
    let report = fx.remover.execute(EmployeeRemovalRequest::delete(b.clone())).await;
    assert_eq!(report.error_code, Some(ErrorCode::RemovalInProgress));
    assert!(fx.store.calls().is_empty());
    assert!(fx.find(b.id).await.is_some());

    drop(lease);
    let report = fx.remover.execute(EmployeeRemovalRequest::delete(b.clone())).await;
    assert!(report.outcome.success);
    assert!(!fx.remover.locks().is_held(b.id));
}

// ========== Retry ==========

#[tokio::test]
async fn retry_after_success_is_a_no_op() {
    let fx = Fixture::new().await;
    let a = fx.employee("ayu", EmployeeRole::User).await;
    fx.work_items(a.id, 1).await;

    let first = fx.remover.execute(EmployeeRemovalRequest::delete(a.clone())).await;
    assert!(first.outcome.success);

    let again = fx.remover.retry(EmployeeRemovalRequest::delete(a.clone())).await;
    assert!(again.outcome.success);
    assert_eq!(again.final_state, RemovalState::Succeeded);
    assert_eq!(again.outcome.affected_work_items, 0);
    assert_eq!(again.outcome.deleted_events, 0);
    assert!(
        again
            .outcome
            .notices
            .iter()
            .any(|n| n.contains("already removed"))
    );
    assert!(
        !again
            .outcome
            .notices
            .iter()
            .any(|n| n.ends_with(" removed") && !n.contains("already"))
    );
    assert!(fx.find(a.id).await.is_none());
    assert_eq!(
        audit_actions(&fx, a.id).await,
        vec![AuditAction::WorkItemsDeleted, AuditAction::EmployeeDeleted]
    );
}

#[tokio::test]
async fn retry_after_rollback_completes() {
    let fx = Fixture::new().await;
    let b = fx.employee("bayu", EmployeeRole::User).await;
    let c = fx.employee("citra", EmployeeRole::User).await;
    fx.work_items(b.id, 2).await;
    fx.store.fail(Op::DeleteEmployee);

    let request = EmployeeRemovalRequest::transfer(b.clone(), c.clone());
    let failed = fx.remover.execute(request.clone()).await;
    assert!(!failed.outcome.success);

    fx.store.heal();
    let report = fx.remover.retry(request).await;
    assert!(report.outcome.success);
    assert_eq!(fx.owned_item_ids(c.id).await.len(), 2);
    assert!(fx.find(b.id).await.is_none());
}

// ========== Impact ==========

#[tokio::test]
async fn impact_counts_dependents_and_degrades_to_zero() {
    let fx = Fixture::new().await;
    let a = fx.employee("ayu", EmployeeRole::User).await;
    fx.work_items(a.id, 3).await;
    fx.event(a.id, vec![]).await;
    fx.event(a.id, vec![]).await;

    let analyzer = ImpactAnalyzer::new(fx.store.clone());
    let impact = analyzer.analyze(a.id).await;
    assert_eq!((impact.work_items, impact.events, impact.total), (3, 2, 5));
    assert!(fx.store.mutations().is_empty());

    fx.store.fail(Op::CountWorkItems);
    let impact = analyzer.analyze(a.id).await;
    assert_eq!((impact.work_items, impact.events, impact.total), (0, 2, 2));

    fx.store.fail(Op::CountEvents);
    assert!(analyzer.analyze(a.id).await.is_empty());
}
