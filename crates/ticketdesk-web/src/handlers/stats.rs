//! 통계 API 핸들러.

use axum::extract::State;
use axum::Json;
use ticketdesk_core::models::stats::StatsSnapshot;

use crate::error::ApiError;
use crate::AppState;

/// 통계 스냅샷 조회
///
/// GET /api/tickets/stats/
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, ApiError> {
    let snapshot = state.stats.snapshot().await?;
    Ok(Json(snapshot))
}
