//! Removal preconditions
//!
//! Checked while the run is still `Validating`; nothing has been mutated when
//! any of these reject.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::Employee;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::RemovalError;
use crate::db::PersonnelStore;

/// Result of a passed admin floor check
///
/// Holds the admin floor lease (if one was needed) until dropped, so the
/// removal must keep it alive until the identity step is done.
#[derive(Debug)]
pub struct FloorClearance {
    /// Stored record, `None` when the employee is already gone
    pub current: Option<Employee>,
    _lease: Option<AdminFloorLease>,
}

/// Refuses to remove the last active administrator
pub struct AdminFloorGuard;

impl AdminFloorGuard {
    /// Decides on the stored record, never on the caller's snapshot
    ///
    /// Fails closed: if the record or the admin count cannot be read the
    /// removal is refused. Removals of active admins are serialized through
    /// the admin floor lease, so two of them cannot both see the other as
    /// the remaining admin.
    pub async fn check(
        store: &dyn PersonnelStore,
        locks: &RemovalLocks,
        employee: &Employee,
    ) -> Result<FloorClearance, RemovalError> {
        let current = Self::read_current(store, employee.id).await?;
        if !current.as_ref().is_some_and(Employee::is_active_admin) {
            return Ok(FloorClearance {
                current,
                _lease: None,
            });
        }

        let lease = locks.lock_admin_floor().await;

        // Role or status may have changed while waiting for the lease
        let current = Self::read_current(store, employee.id).await?;
        if !current.as_ref().is_some_and(Employee::is_active_admin) {
            return Ok(FloorClearance {
                current,
                _lease: None,
            });
        }

        let others = store
            .count_active_admins_excluding(employee.id)
            .await
            .map_err(|source| RemovalError::PreconditionUnverified {
                check: "remaining administrators",
                source,
            })?;

        if others == 0 {
            crate::security_log!(
                WARN,
                "last_admin_removal_blocked",
                employee_id = employee.id
            );
            return Err(RemovalError::LastActiveAdmin {
                employee_id: employee.id,
            });
        }
        Ok(FloorClearance {
            current,
            _lease: Some(lease),
        })
    }

    async fn read_current(
        store: &dyn PersonnelStore,
        employee_id: i64,
    ) -> Result<Option<Employee>, RemovalError> {
        store
            .find_employee(employee_id)
            .await
            .map_err(|source| RemovalError::PreconditionUnverified {
                check: "employee record",
                source,
            })
    }
}

/// Validate a transfer target and return its current record
///
/// Missing and self-referential targets are rejected without touching the
/// store.
pub async fn resolve_transfer_target(
    store: &dyn PersonnelStore,
    employee: &Employee,
    target: Option<&Employee>,
) -> Result<Employee, RemovalError> {
    let target = target.ok_or(RemovalError::TransferTargetRequired)?;
    if target.id == employee.id {
        return Err(RemovalError::TransferTargetIsSelf);
    }

    let current = store
        .find_employee(target.id)
        .await
        .map_err(|source| RemovalError::PreconditionUnverified {
            check: "transfer target",
            source,
        })?;

    match current {
        None => Err(RemovalError::TransferTargetNotFound(target.id)),
        Some(t) if !t.is_active => Err(RemovalError::TransferTargetInactive(t.id)),
        Some(t) => Ok(t),
    }
}

/// Per-employee advisory locks plus the admin floor lock
///
/// At most one removal per employee id runs at a time inside this process,
/// and at most one removal of an active admin.
#[derive(Clone, Default)]
pub struct RemovalLocks {
    // employee id -> lease start (millis)
    held: Arc<DashMap<i64, i64>>,
    admin_floor: Arc<Mutex<()>>,
}

impl RemovalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if a removal for `employee_id` is already running
    pub fn try_acquire(&self, employee_id: i64) -> Option<RemovalLease> {
        match self.held.entry(employee_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(shared::util::now_millis());
                Some(RemovalLease {
                    employee_id,
                    held: self.held.clone(),
                })
            }
        }
    }

    pub fn is_held(&self, employee_id: i64) -> bool {
        self.held.contains_key(&employee_id)
    }

    /// Waits for other admin removals to finish
    pub async fn lock_admin_floor(&self) -> AdminFloorLease {
        AdminFloorLease {
            _guard: self.admin_floor.clone().lock_owned().await,
        }
    }

    pub fn is_admin_floor_held(&self) -> bool {
        self.admin_floor.try_lock().is_err()
    }
}

/// Exclusive right to take an active admin below the floor check
#[derive(Debug)]
pub struct AdminFloorLease {
    _guard: OwnedMutexGuard<()>,
}

/// Released on drop
#[derive(Debug)]
pub struct RemovalLease {
    employee_id: i64,
    held: Arc<DashMap<i64, i64>>,
}

impl RemovalLease {
    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }
}

impl Drop for RemovalLease {
    fn drop(&mut self) {
        self.held.remove(&self.employee_id);
    }
}
