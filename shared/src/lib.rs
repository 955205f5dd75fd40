//! Shared types for the staff workspace
//!
//! Data models, removal DTOs, the unified error system and small
//! utilities used by the server and the admin frontend.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
