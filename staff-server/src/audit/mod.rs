//! Audit trail for destructive personnel operations
//!
//! Entries go to the `audit_log` table through the [`PersonnelStore`] and are
//! mirrored to the `audit` tracing target, which the logger routes to the
//! permanent audit files.
//!
//! Writes are best effort: a failed write is logged and reported as `false`,
//! never as an error.
//!
//! [`PersonnelStore`]: crate::db::PersonnelStore

mod recorder;

pub use recorder::AuditRecorder;
