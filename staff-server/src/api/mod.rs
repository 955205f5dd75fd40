//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`employees`] - 员工删除影响预览和级联删除

pub mod employees;
pub mod health;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(employees::router())
}

/// Build the application with middleware and state attached
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(
            ServiceBuilder::new()
                // Request ID - generate, then echo back on the response
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                // Request tracing (INFO level)
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
