//! AI 분류 제안 API 핸들러.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use ticketdesk_core::models::ticket::{validate_description, Category, Priority};

use crate::error::ApiError;
use crate::AppState;

/// 분류 요청 DTO
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// 티켓 설명 (앞뒤 공백 제거 후 1~5000자)
    pub description: String,
}

/// 분류 응답 DTO
///
/// 제안이 없으면 두 필드 모두 null이고 `llm_available`은 false.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassifyResponse {
    pub suggested_category: Option<Category>,
    pub suggested_priority: Option<Priority>,
    pub llm_available: bool,
}

/// 설명 기반 카테고리/우선순위 제안
///
/// POST /api/tickets/classify/
///
/// 입력이 유효하면 분류 성공 여부와 관계없이 200을 반환한다.
pub async fn classify_ticket(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Json(req) = payload?;
    let description = validate_description(&req.description)?;

    let suggestion = state.classifier.classify(&description).await;

    Ok(Json(ClassifyResponse {
        suggested_category: suggestion.map(|s| s.category),
        suggested_priority: suggestion.map(|s| s.priority),
        llm_available: suggestion.is_some(),
    }))
}
