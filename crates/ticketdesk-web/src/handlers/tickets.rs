//! 티켓 API 핸들러.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ticketdesk_core::models::ticket::{NewTicket, Ticket, TicketFilter, TicketPatch};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("티켓 ID: {id}"))
}

/// 티켓 목록 조회 (최신순)
///
/// GET /api/tickets/?category=&priority=&status=&search=
pub async fn list_tickets(
    State(state): State<AppState>,
    query: Result<Query<TicketFilter>, QueryRejection>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let Query(filter) = query?;
    let tickets = state.store.list_tickets(&filter).await?;
    Ok(Json(tickets))
}

/// 티켓 생성
///
/// POST /api/tickets/
pub async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let Json(new) = payload?;
    let ticket = state.store.create_ticket(&new).await?;

    info!(id = ticket.id, category = %ticket.category, priority = %ticket.priority, "티켓 생성");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// 티켓 조회
///
/// GET /api/tickets/{id}/
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state.store.get_ticket(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ticket))
}

/// 티켓 부분 업데이트
///
/// PATCH /api/tickets/{id}/
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<TicketPatch>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let Json(patch) = payload?;
    let ticket = state
        .store
        .update_ticket(id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ticket))
}
