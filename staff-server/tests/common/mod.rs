//! Test fixtures: in-memory SQLite wrapped in a fault-injecting store

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::models::{
    AuditEntryCreate, Employee, EmployeeCreate, EmployeeRole, Event, EventCreate, WorkItem,
    WorkItemCreate, WorkItemStatus,
};
use staff_server::db::repository::{RepoError, RepoResult, employee, event, work_item};
use staff_server::{DbService, EmployeeRemover, PersonnelStore, SqliteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FindEmployee,
    CountWorkItems,
    CountEvents,
    ReassignWorkItems,
    RestoreWorkItemOwner,
    DeleteWorkItems,
    DeleteEvents,
    DeleteEmployee,
    InsertEmployee,
    InsertAudit,
    ListActive,
    CountAdmins,
}

impl Op {
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Op::ReassignWorkItems
                | Op::RestoreWorkItemOwner
                | Op::DeleteWorkItems
                | Op::DeleteEvents
                | Op::DeleteEmployee
                | Op::InsertEmployee
        )
    }
}

/// Delegates to `SqliteStore`, failing the operations it is told to fail
pub struct FaultyStore {
    inner: SqliteStore,
    failing: Mutex<HashSet<Op>>,
    // op -> number of calls allowed to succeed before it starts failing
    failing_after: Mutex<HashMap<Op, usize>>,
    // delete_employee reports one row without deleting anything
    phantom_delete: AtomicBool,
    calls: Mutex<Vec<Op>>,
}

impl FaultyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            failing_after: Mutex::new(HashMap::new()),
            phantom_delete: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Let `op` succeed `n` times, then fail it
    pub fn fail_after(&self, op: Op, n: usize) {
        self.failing_after.lock().unwrap().insert(op, n);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
        self.failing_after.lock().unwrap().clear();
        self.phantom_delete.store(false, Ordering::SeqCst);
    }

    pub fn phantom_delete(&self) {
        self.phantom_delete.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Op> {
        self.calls().into_iter().filter(|op| op.is_mutation()).collect()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn enter(&self, op: Op) -> RepoResult<()> {
        let previous = {
            let mut calls = self.calls.lock().unwrap();
            let previous = calls.iter().filter(|c| **c == op).count();
            calls.push(op);
            previous
        };
        let exhausted = self
            .failing_after
            .lock()
            .unwrap()
            .get(&op)
            .is_some_and(|allowed| previous >= *allowed);
        if exhausted || self.failing.lock().unwrap().contains(&op) {
            return Err(RepoError::Database(format!("injected failure: {op:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl PersonnelStore for FaultyStore {
    async fn find_employee(&self, id: i64) -> RepoResult<Option<Employee>> {
        self.enter(Op::FindEmployee)?;
        self.inner.find_employee(id).await
    }

    async fn count_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64> {
        self.enter(Op::CountWorkItems)?;
        self.inner.count_work_items_by_employee(employee_id).await
    }

    async fn count_events_by_creator(&self, employee_id: i64) -> RepoResult<u64> {
        self.enter(Op::CountEvents)?;
        self.inner.count_events_by_creator(employee_id).await
    }

    async fn reassign_work_items(&self, from: i64, to: i64, now: i64) -> RepoResult<Vec<i64>> {
        self.enter(Op::ReassignWorkItems)?;
        self.inner.reassign_work_items(from, to, now).await
    }

    async fn restore_work_item_owner(&self, ids: &[i64], owner: i64, now: i64) -> RepoResult<u64> {
        self.enter(Op::RestoreWorkItemOwner)?;
        self.inner.restore_work_item_owner(ids, owner, now).await
    }

    async fn delete_work_items_by_employee(&self, employee_id: i64) -> RepoResult<u64> {
        self.enter(Op::DeleteWorkItems)?;
        self.inner.delete_work_items_by_employee(employee_id).await
    }

    async fn delete_events_by_creator(&self, employee_id: i64) -> RepoResult<u64> {
        self.enter(Op::DeleteEvents)?;
        self.inner.delete_events_by_creator(employee_id).await
    }

    async fn delete_employee(&self, id: i64) -> RepoResult<u64> {
        self.enter(Op::DeleteEmployee)?;
        if self.phantom_delete.load(Ordering::SeqCst) {
            return Ok(1);
        }
        self.inner.delete_employee(id).await
    }

    async fn insert_employee(&self, employee: &Employee) -> RepoResult<()> {
        self.enter(Op::InsertEmployee)?;
        self.inner.insert_employee(employee).await
    }

    async fn insert_audit_entry(&self, entry: AuditEntryCreate) -> RepoResult<()> {
        self.enter(Op::InsertAudit)?;
        self.inner.insert_audit_entry(entry).await
    }

    async fn list_active_employees_excluding(&self, id: i64) -> RepoResult<Vec<Employee>> {
        self.enter(Op::ListActive)?;
        self.inner.list_active_employees_excluding(id).await
    }

    async fn count_active_admins_excluding(&self, id: i64) -> RepoResult<u64> {
        self.enter(Op::CountAdmins)?;
        self.inner.count_active_admins_excluding(id).await
    }
}

pub struct Fixture {
    pub db: DbService,
    pub store: Arc<FaultyStore>,
    pub remover: EmployeeRemover,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let store = Arc::new(FaultyStore::new(SqliteStore::new(db.pool.clone())));
        let remover = EmployeeRemover::new(store.clone(), "test-admin");
        Self { db, store, remover }
    }

    pub async fn employee(&self, username: &str, role: EmployeeRole) -> Employee {
        employee::create(
            &self.db.pool,
            EmployeeCreate {
                full_name: format!("{} Santoso", username),
                personnel_number: Some(format!("19800101200501{}", username.len())),
                grade: Some("IV/a".to_string()),
                position: Some("Section head".to_string()),
                username: username.to_string(),
                email: Some(format!("{username}@example.org")),
                role,
            },
        )
        .await
        .unwrap()
    }

    pub async fn work_items(&self, owner: i64, n: usize) -> Vec<WorkItem> {
        let mut items = Vec::with_capacity(n);
        for i in 0..n {
            let item = work_item::create(
                &self.db.pool,
                WorkItemCreate {
                    employee_id: owner,
                    title: format!("Letter {i}"),
                    category: "correspondence".to_string(),
                    description: Some("incoming".to_string()),
                    status: WorkItemStatus::InProgress,
                    received_date: Some("2026-02-10".to_string()),
                    function_tag: Some("planning".to_string()),
                },
            )
            .await
            .unwrap();
            items.push(item);
        }
        items
    }

    pub async fn event(&self, creator: i64, participants: Vec<i64>) -> Event {
        event::create(
            &self.db.pool,
            EventCreate {
                created_by: creator,
                title: "Coordination trip".to_string(),
                start_date: "2026-05-04".to_string(),
                end_date: "2026-05-06".to_string(),
                location: Some("Provincial office".to_string()),
                participant_ids: participants,
            },
        )
        .await
        .unwrap()
    }

    pub async fn find(&self, id: i64) -> Option<Employee> {
        employee::find_by_id(&self.db.pool, id).await.unwrap()
    }

    pub async fn owned_item_ids(&self, owner: i64) -> Vec<i64> {
        work_item::find_by_employee(&self.db.pool, owner)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect()
    }

    pub async fn active_admins(&self) -> u64 {
        employee::count_active_admins_excluding(&self.db.pool, 0)
            .await
            .unwrap()
    }

    pub async fn event_count(&self, creator: i64) -> u64 {
        event::count_by_creator(&self.db.pool, creator).await.unwrap()
    }
}
