//! Employee API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/employees/{id}/impact | GET | 删除影响预览 |
//! | /api/employees/{id}/transfer-candidates | GET | 可接收工作项的在职员工 |
//! | /api/employees/{id} | DELETE | 级联删除员工 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Employee router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", axum::routing::delete(handler::remove))
        .route("/{id}/impact", get(handler::impact))
        .route("/{id}/transfer-candidates", get(handler::transfer_candidates))
}
