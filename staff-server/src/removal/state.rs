//! Removal state machine
//!
//! ```text
//! Validating ─> TransferringOrDeletingWorkItems ─> PurgingEvents ─> RemovingIdentity ─> Verifying ─> Succeeded
//!     │                      │                          │                  │                │
//!     │                      └──────────────────────────┴──────────────────┴────────────────┴─> RollingBack ─> Failed
//!     └─────────────────────────────────────────────────────────────────────────────────────────────────────> Failed
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalState {
    Validating,
    TransferringOrDeletingWorkItems,
    PurgingEvents,
    RemovingIdentity,
    Verifying,
    Succeeded,
    RollingBack,
    Failed,
}

impl RemovalState {
    pub fn can_transition_to(self, next: RemovalState) -> bool {
        use RemovalState::*;
        matches!(
            (self, next),
            (Validating, TransferringOrDeletingWorkItems)
                | (Validating, Failed)
                | (TransferringOrDeletingWorkItems, PurgingEvents)
                | (PurgingEvents, RemovingIdentity)
                | (RemovingIdentity, Verifying)
                | (Verifying, Succeeded)
                | (TransferringOrDeletingWorkItems, RollingBack)
                | (PurgingEvents, RollingBack)
                | (RemovingIdentity, RollingBack)
                | (Verifying, RollingBack)
                | (RollingBack, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for RemovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::TransferringOrDeletingWorkItems => "transferring_or_deleting_work_items",
            Self::PurgingEvents => "purging_events",
            Self::RemovingIdentity => "removing_identity",
            Self::Verifying => "verifying",
            Self::Succeeded => "succeeded",
            Self::RollingBack => "rolling_back",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: RemovalState,
    pub to: RemovalState,
    /// Unix millis
    pub at: i64,
}
