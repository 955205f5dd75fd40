//! Removal error taxonomy

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::FailureKind;
use thiserror::Error;

use super::compensation::CompensationFailure;
use crate::db::repository::RepoError;

/// Forward step that touched the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalStep {
    TransferWorkItems,
    DeleteWorkItems,
    PurgeEvents,
    DeleteEmployee,
    VerifyDeletion,
}

impl std::fmt::Display for RemovalStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TransferWorkItems => "transfer work items",
            Self::DeleteWorkItems => "delete work items",
            Self::PurgeEvents => "purge events",
            Self::DeleteEmployee => "delete employee",
            Self::VerifyDeletion => "verify deletion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RemovalError {
    // ========== Preconditions (nothing mutated) ==========
    #[error("A target employee is required for transfer")]
    TransferTargetRequired,

    #[error("Work items cannot be transferred to the employee being removed")]
    TransferTargetIsSelf,

    #[error("Transfer target {0} not found")]
    TransferTargetNotFound(i64),

    #[error("Transfer target {0} is not active")]
    TransferTargetInactive(i64),

    #[error("Employee {employee_id} is the last active administrator")]
    LastActiveAdmin { employee_id: i64 },

    #[error("Removal of employee {0} is already in progress")]
    RemovalInProgress(i64),

    #[error("Could not check {check}: {source}")]
    PreconditionUnverified {
        check: &'static str,
        #[source]
        source: RepoError,
    },

    // ========== Step failures (rolled back) ==========
    #[error("Failed to {step}: {source}")]
    StepFailed {
        step: RemovalStep,
        #[source]
        source: RepoError,
    },

    #[error("Employee {employee_id} still exists after deletion")]
    VerificationFailed { employee_id: i64 },

    // ========== Rollback failed ==========
    #[error("{cause}; rollback incomplete ({} compensation(s) failed)", .failures.len())]
    CompensationFailed {
        cause: Box<RemovalError>,
        failures: Vec<CompensationFailure>,
    },
}

impl RemovalError {
    pub fn step(step: RemovalStep) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::StepFailed { step, source }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::TransferTargetRequired
            | Self::TransferTargetIsSelf
            | Self::TransferTargetNotFound(_)
            | Self::TransferTargetInactive(_)
            | Self::LastActiveAdmin { .. }
            | Self::RemovalInProgress(_)
            | Self::PreconditionUnverified { .. } => FailureKind::Precondition,
            Self::StepFailed { .. } | Self::VerificationFailed { .. } => FailureKind::RolledBack,
            Self::CompensationFailed { .. } => FailureKind::CompensationFailed,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TransferTargetRequired => ErrorCode::TransferTargetRequired,
            Self::TransferTargetIsSelf
            | Self::TransferTargetNotFound(_)
            | Self::TransferTargetInactive(_) => ErrorCode::TransferTargetInvalid,
            Self::LastActiveAdmin { .. } => ErrorCode::LastActiveAdmin,
            Self::RemovalInProgress(_) => ErrorCode::RemovalInProgress,
            Self::PreconditionUnverified { .. } => ErrorCode::DatabaseError,
            Self::StepFailed { .. } | Self::VerificationFailed { .. } => {
                ErrorCode::RemovalRolledBack
            }
            Self::CompensationFailed { .. } => ErrorCode::RemovalCompensationFailed,
        }
    }

    /// Operator-facing message
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::Precondition => self.to_string(),
            FailureKind::RolledBack => format!("Operation cancelled, data restored: {self}"),
            FailureKind::CompensationFailed => {
                format!("Critical error, contact an administrator: {self}")
            }
        }
    }
}

impl From<RemovalError> for AppError {
    fn from(err: RemovalError) -> Self {
        let mut app = AppError::with_message(err.code(), err.user_message());
        if let RemovalError::CompensationFailed { failures, .. } = &err {
            let failed: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
            app = app.with_detail("failed_compensations", failed);
        }
        app
    }
}
