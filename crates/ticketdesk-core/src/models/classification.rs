//! 분류 제안 모델 및 응답 검증기.
//!
//! 모델 응답의 두 문자열 필드를 소문자로 정규화한 뒤 닫힌 enum으로 변환한다.
//! 둘 중 하나라도 어휘 밖이면 제안 전체를 거부한다 (부분 제안 없음).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::ticket::{Category, Priority};

/// 분류 제안 (저장되지 않는 요청 단위 값)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSuggestion {
    /// 제안 카테고리
    pub category: Category,
    /// 제안 우선순위
    pub priority: Priority,
}

impl ClassificationSuggestion {
    /// 두 문자열을 검증하여 제안 생성
    ///
    /// 대소문자는 무시하며, 두 값이 모두 유효해야 성공한다.
    pub fn validate(category: &str, priority: &str) -> Result<Self, CoreError> {
        let category = category.to_lowercase().parse::<Category>();
        let priority = priority.to_lowercase().parse::<Priority>();

        match (category, priority) {
            (Ok(category), Ok(priority)) => Ok(Self { category, priority }),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }
}
