//! Data models
//!
//! Shared between staff-server and the admin frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake generated).

pub mod audit;
pub mod employee;
pub mod event;
pub mod removal;
pub mod work_item;

// Re-exports
pub use audit::*;
pub use employee::*;
pub use event::*;
pub use removal::*;
pub use work_item::*;
