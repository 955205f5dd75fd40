//! Employee Model

use serde::{Deserialize, Serialize};

/// Employee role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum EmployeeRole {
    Admin,
    User,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee identity record (人员目录)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    /// Government personnel number
    pub personnel_number: Option<String>,
    /// Grade / rank code
    pub grade: Option<String>,
    /// Position title
    pub position: Option<String>,
    /// Login handle
    pub username: String,
    pub email: Option<String>,
    pub role: EmployeeRole,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// Active administrator (counts toward the admin floor)
    pub fn is_active_admin(&self) -> bool {
        self.is_active && self.role == EmployeeRole::Admin
    }

    /// Label used in audit entries and notices, e.g. `Siti Rahma (#42)`
    pub fn label(&self) -> String {
        format!("{} (#{})", self.full_name, self.id)
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub full_name: String,
    pub personnel_number: Option<String>,
    pub grade: Option<String>,
    pub position: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub role: EmployeeRole,
}
