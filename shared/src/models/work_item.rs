//! Work Item Model (任务/工作量)

use serde::{Deserialize, Serialize};

/// Work item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum WorkItemStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

/// Work item owned by an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WorkItem {
    pub id: i64,
    /// Owning employee (mutable reference)
    pub employee_id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub status: WorkItemStatus,
    /// Received date (YYYY-MM-DD)
    pub received_date: Option<String>,
    /// Functional classification tag
    pub function_tag: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create work item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemCreate {
    pub employee_id: i64,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkItemStatus,
    pub received_date: Option<String>,
    pub function_tag: Option<String>,
}
