//! PersonnelStore port
//!
//! The per-entity operations the removal orchestrator consumes. `SqliteStore`
//! is the production implementation; tests wrap it to inject faults.

use async_trait::async_trait;
use shared::models::{AuditEntryCreate, Employee};
use sqlx::SqlitePool;

use super::repository::{RepoResult, audit_log, employee, event, work_item};

#[async_trait]
pub trait PersonnelStore: Send + Sync {
    async fn find_employee(&self, id: i64) -> RepoResult<Option<Employee>>;

    async fn count_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64>;

    async fn count_events_by_creator(&self, employee_id: i64) -> RepoResult<u64>;

    /// Re-point every work item of `from` to `to`; returns the moved ids
    async fn reassign_work_items(&self, from: i64, to: i64, now: i64) -> RepoResult<Vec<i64>>;

    /// Re-point exactly `ids` back to `owner`
    async fn restore_work_item_owner(&self, ids: &[i64], owner: i64, now: i64) -> RepoResult<u64>;

    async fn delete_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64>;

    async fn delete_events_by_creator(&self, employee_id: i64) -> RepoResult<u64>;

    /// Rows removed; 0 when the employee is already gone
    async fn delete_employee(&self, id: i64) -> RepoResult<u64>;

    /// Insert with the explicit id and field values given
    async fn insert_employee(&self, employee: &Employee) -> RepoResult<()>;

    async fn insert_audit_entry(&self, entry: AuditEntryCreate) -> RepoResult<()>;

    async fn list_active_employees_excluding(&self, id: i64) -> RepoResult<Vec<Employee>>;

    async fn count_active_admins_excluding(&self, id: i64) -> RepoResult<u64>;
}

/// SQLite-backed store
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PersonnelStore for SqliteStore {
    async fn find_employee(&self, id: i64) -> RepoResult<Option<Employee>> {
        employee::find_by_id(&self.pool, id).await
    }

    async fn count_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64> {
        work_item::count_by_employee(&self.pool, employee_id).await
    }

    async fn count_events_by_creator(&self, employee_id: i64) -> RepoResult<u64> {
        event::count_by_creator(&self.pool, employee_id).await
    }

    async fn reassign_work_items(&self, from: i64, to: i64, now: i64) -> RepoResult<Vec<i64>> {
        work_item::reassign_owner(&self.pool, from, to, now).await
    }

    async fn restore_work_item_owner(&self, ids: &[i64], owner: i64, now: i64) -> RepoResult<u64> {
        work_item::set_owner(&self.pool, ids, owner, now).await
    }

    async fn delete_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64> {
        work_item::delete_by_employee(&self.pool, employee_id).await
    }

    async fn delete_events_by_creator(&self, employee_id: i64) -> RepoResult<u64> {
        event::delete_by_creator(&self.pool, employee_id).await
    }

    async fn delete_employee(&self, id: i64) -> RepoResult<u64> {
        employee::delete(&self.pool, id).await
    }

    async fn insert_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee::insert(&self.pool, employee).await
    }

    async fn insert_audit_entry(&self, entry: AuditEntryCreate) -> RepoResult<()> {
        audit_log::append(&self.pool, &entry).await.map(|_| ())
    }

    async fn list_active_employees_excluding(&self, id: i64) -> RepoResult<Vec<Employee>> {
        employee::find_active_excluding(&self.pool, id).await
    }

    async fn count_active_admins_excluding(&self, id: i64) -> RepoResult<u64> {
        employee::count_active_admins_excluding(&self.pool, id).await
    }
}
