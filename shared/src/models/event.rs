//! Calendar Event Model (日程/出差)

use serde::{Deserialize, Serialize};

/// Calendar or trip event created by an employee
///
/// Participants live in the `event_participant` join table and are removed
/// together with their event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    /// Creator employee
    pub created_by: i64,
    pub title: String,
    /// Start date (YYYY-MM-DD)
    pub start_date: String,
    /// End date (YYYY-MM-DD)
    pub end_date: String,
    pub location: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub created_by: i64,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub location: Option<String>,
    #[serde(default)]
    pub participant_ids: Vec<i64>,
}
