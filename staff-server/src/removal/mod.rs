//! Employee removal (员工删除)
//!
//! Removes an employee together with everything that references it, across
//! tables that share no transaction.
//!
//! # Flow
//!
//! ```text
//! ImpactAnalyzer (advisory, read-only)
//!
//! EmployeeRemover::execute
//!   ├─ Validating        RemovalLocks · resolve_transfer_target · AdminFloorGuard
//!   ├─ work items        DependentResolver::transfer ─> RestoreWorkItemOwner
//!   │                    DependentResolver::delete   (irreversible)
//!   ├─ events            EventPurger::purge          (irreversible)
//!   ├─ identity          IdentityRemover::delete     ─> RecreateEmployee
//!   └─ verify            IdentityRemover::verify_removed
//!
//! on failure: CompensationStack::unwind (LIFO) ─> Failed
//! ```
//!
//! Audit entries are written after each milestone through [`AuditRecorder`];
//! their failure never changes the outcome.
//!
//! [`AuditRecorder`]: crate::audit::AuditRecorder

mod compensation;
mod dependents;
mod error;
mod events;
mod guard;
mod identity;
mod impact;
mod saga;
mod state;

pub use compensation::{
    Compensation, CompensationFailure, CompensationStack, StepOutcome, UnwindReport,
};
pub use dependents::DependentResolver;
pub use error::{RemovalError, RemovalStep};
pub use events::EventPurger;
pub use guard::{
    AdminFloorGuard, AdminFloorLease, FloorClearance, RemovalLease, RemovalLocks,
    resolve_transfer_target,
};
pub use identity::IdentityRemover;
pub use impact::ImpactAnalyzer;
pub use saga::{EmployeeRemover, RemovalReport};
pub use state::{RemovalState, StateTransition};
