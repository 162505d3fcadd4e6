//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 티켓
        .route(
            "/tickets/",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route(
            "/tickets/{id}/",
            get(handlers::tickets::get_ticket).patch(handlers::tickets::update_ticket),
        )
        // 통계
        .route("/tickets/stats/", get(handlers::stats::get_stats))
        // AI 분류 제안
        .route("/tickets/classify/", post(handlers::classify::classify_ticket))
}
