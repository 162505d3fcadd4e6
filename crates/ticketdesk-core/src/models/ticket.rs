//! 티켓 모델.
//!
//! 카테고리/우선순위/상태는 닫힌 enum으로 표현하며,
//! 그 외 값은 역직렬화 또는 `FromStr` 단계에서 거부된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 제목 최대 길이 (문자 수)
pub const MAX_TITLE_LEN: usize = 200;

/// 설명 최대 길이 (문자 수): 분류 요청 본문에도 동일하게 적용
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// 티켓 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 결제, 청구서, 구독, 환불
    Billing,
    /// 버그, 오류, 장애, 성능, 연동 실패
    Technical,
    /// 로그인, 비밀번호 재설정, 프로필, 접근 권한
    Account,
    /// 기능 요청, 일반 문의, 피드백
    General,
}

impl Category {
    /// 전체 카테고리 (집계 초기화용)
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    /// 저장/직렬화용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "billing" => Ok(Category::Billing),
            "technical" => Ok(Category::Technical),
            "account" => Ok(Category::Account),
            "general" => Ok(Category::General),
            other => Err(CoreError::validation(
                "category",
                format!("허용되지 않는 값: {other}"),
            )),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 티켓 우선순위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// 전체 우선순위 (집계 초기화용)
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// 저장/직렬화용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(CoreError::validation(
                "priority",
                format!("허용되지 않는 값: {other}"),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 티켓 처리 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// 전체 상태 목록
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// 저장/직렬화용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(CoreError::validation(
                "status",
                format!("허용되지 않는 값: {other}"),
            )),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장된 티켓
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// 저장소가 부여한 ID
    pub id: i64,
    /// 제목
    pub title: String,
    /// 상세 설명
    pub description: String,
    /// 카테고리
    pub category: Category,
    /// 우선순위
    pub priority: Priority,
    /// 처리 상태
    pub status: TicketStatus,
    /// 생성 시각 (저장소 부여, 불변)
    pub created_at: DateTime<Utc>,
}

/// 티켓 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    /// 미지정 시 `open`
    #[serde(default)]
    pub status: TicketStatus,
}

impl NewTicket {
    /// 앞뒤 공백을 제거하고 길이 제한을 검증한 사본 반환
    pub fn validated(&self) -> Result<Self, CoreError> {
        Ok(Self {
            title: validate_title(&self.title)?,
            description: validate_description(&self.description)?,
            category: self.category,
            priority: self.priority,
            status: self.status,
        })
    }
}

/// 티켓 부분 업데이트 (None 필드는 유지)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

impl TicketPatch {
    /// 변경할 필드가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// 지정된 텍스트 필드만 검증한 사본 반환
    pub fn validated(&self) -> Result<Self, CoreError> {
        Ok(Self {
            title: self.title.as_deref().map(validate_title).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            category: self.category,
            priority: self.priority,
            status: self.status,
        })
    }

    /// 기존 티켓에 패치 적용
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(title) = &self.title {
            ticket.title = title.clone();
        }
        if let Some(description) = &self.description {
            ticket.description = description.clone();
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
    }
}

/// 티켓 목록 필터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    /// 제목/설명 부분 일치 검색어 (대소문자 무시)
    pub search: Option<String>,
}

impl TicketFilter {
    /// 공백만 있는 검색어는 None으로 정규화
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn validate_title(raw: &str) -> Result<String, CoreError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CoreError::validation("title", "비어 있을 수 없음"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::validation(
            "title",
            format!("{MAX_TITLE_LEN}자를 초과할 수 없음"),
        ));
    }
    Ok(title.to_string())
}

/// 설명 필드 검증 (분류 요청 본문 검증에도 사용)
pub fn validate_description(raw: &str) -> Result<String, CoreError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(CoreError::validation("description", "비어 있을 수 없음"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::validation(
            "description",
            format!("{MAX_DESCRIPTION_LEN}자를 초과할 수 없음"),
        ));
    }
    Ok(description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ticket() -> Ticket {
        Ticket {
            id: 1,
            title: "결제 실패".to_string(),
            description: "카드 결제가 두 번 청구됨".to_string(),
            category: Category::Billing,
            priority: Priority::High,
            status: TicketStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Technical).unwrap(),
            "\"technical\""
        );
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn unknown_enum_value_rejected_on_deserialize() {
        let result: Result<Category, _> = serde_json::from_str("\"urgent\"");
        assert!(result.is_err());
        let result: Result<Priority, _> = serde_json::from_str("\"blocker\"");
        assert!(result.is_err());
    }

    #[test]
    fn from_str_matches_as_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        for p in Priority::ALL {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        for s in TicketStatus::ALL {
            assert_eq!(s.as_str().parse::<TicketStatus>().unwrap(), s);
        }
        assert!("Billing".parse::<Category>().is_err());
    }

    #[test]
    fn new_ticket_defaults_to_open() {
        let json = r#"{"title":"t","description":"d","category":"account","priority":"low"}"#;
        let new: NewTicket = serde_json::from_str(json).unwrap();
        assert_eq!(new.status, TicketStatus::Open);
    }

    #[test]
    fn new_ticket_validation_trims_and_limits() {
        let new = NewTicket {
            title: "  로그인 불가  ".to_string(),
            description: " 비밀번호 재설정 메일이 오지 않음 ".to_string(),
            category: Category::Account,
            priority: Priority::Medium,
            status: TicketStatus::Open,
        };
        let v = new.validated().unwrap();
        assert_eq!(v.title, "로그인 불가");
        assert_eq!(v.description, "비밀번호 재설정 메일이 오지 않음");

        let too_long = NewTicket {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..new.clone()
        };
        assert!(matches!(
            too_long.validated(),
            Err(CoreError::Validation { ref field, .. }) if field == "title"
        ));

        let blank = NewTicket {
            description: "   ".to_string(),
            ..new
        };
        assert!(blank.validated().is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut ticket = sample_ticket();
        let created_at = ticket.created_at;
        let patch = TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut ticket);
        assert_eq!(ticket.status, TicketStatus::Resolved);
        assert_eq!(ticket.category, Category::Billing);
        assert_eq!(ticket.created_at, created_at);
        assert!(TicketPatch::default().is_empty());
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let filter = TicketFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), None);

        let filter = TicketFilter {
            search: Some(" invoice ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), Some("invoice"));
    }
}
