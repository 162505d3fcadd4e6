//! 티켓 분류기.
//!
//! 티켓 설명으로 고정 프롬프트를 구성해 LLM에 전달하고,
//! 응답을 `ClassificationSuggestion`으로 검증한다.
//! 어떤 실패도 호출자에게 에러로 전파하지 않으며 `None`으로 수렴한다.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

use ticketdesk_core::config::ClassifierConfig;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::classification::ClassificationSuggestion;
use ticketdesk_core::ports::llm_provider::{CompletionRequest, LlmProvider};

/// 분류 실패 원인 (내부용: 경계에서 `None`으로 변환)
#[derive(Debug, Error)]
enum ClassifyError {
    #[error("LLM API 키 미설정")]
    NotConfigured,

    #[error("LLM 호출 실패: {0}")]
    Provider(#[source] CoreError),

    #[error("LLM 응답 시간 초과 ({0:?})")]
    Timeout(Duration),

    #[error("LLM 응답 파싱 실패: {reason} (raw: {raw})")]
    Malformed { reason: String, raw: String },

    #[error("LLM 응답 값이 허용 범위 밖: {0}")]
    Invalid(#[source] CoreError),
}

/// 티켓 분류기
pub struct TicketClassifier {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl TicketClassifier {
    /// 설정값으로 분류기 생성
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &ClassifierConfig) -> Self {
        Self {
            provider,
            timeout: config.timeout(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// 분류 기능 사용 가능 여부 (자격증명 설정 여부)
    pub fn is_available(&self) -> bool {
        self.provider.is_configured()
    }

    /// 설명을 분류하여 제안 반환
    ///
    /// 자격증명 없음, 네트워크/제공자 실패, 시간 초과, 형식 오류,
    /// 허용 범위 밖 값은 모두 `None`이 된다.
    pub async fn classify(&self, description: &str) -> Option<ClassificationSuggestion> {
        match self.try_classify(description).await {
            Ok(suggestion) => {
                debug!(
                    category = %suggestion.category,
                    priority = %suggestion.priority,
                    "티켓 분류 완료"
                );
                Some(suggestion)
            }
            Err(e) => {
                match &e {
                    ClassifyError::NotConfigured => warn!("분류 건너뜀: {e}"),
                    ClassifyError::Provider(_)
                    | ClassifyError::Timeout(_)
                    | ClassifyError::Malformed { .. } => {
                        error!(provider = self.provider.provider_name(), "분류 실패: {e}")
                    }
                    ClassifyError::Invalid(_) => warn!("분류 결과 거부: {e}"),
                }
                None
            }
        }
    }

    async fn try_classify(&self, description: &str) -> Result<ClassificationSuggestion, ClassifyError> {
        if !self.provider.is_configured() {
            return Err(ClassifyError::NotConfigured);
        }

        let request = CompletionRequest {
            prompt: build_prompt(description),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let text = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| ClassifyError::Timeout(self.timeout))?
            .map_err(ClassifyError::Provider)?;

        let cleaned = strip_code_fence(&text);
        let malformed = |reason: String| ClassifyError::Malformed {
            reason,
            raw: cleaned.chars().take(200).collect(),
        };

        let object: Map<String, Value> =
            serde_json::from_str(cleaned).map_err(|e| malformed(e.to_string()))?;

        let (Some(category), Some(priority)) = (
            object.get("category").and_then(Value::as_str),
            object.get("priority").and_then(Value::as_str),
        ) else {
            return Err(malformed("category/priority 문자열 필드 누락".to_string()));
        };

        ClassificationSuggestion::validate(category, priority).map_err(ClassifyError::Invalid)
    }
}

/// 분류 프롬프트 구성: 설명은 앞뒤 공백 제거 후 그대로 삽입
pub fn build_prompt(description: &str) -> String {
    format!(
        r#"You are a support ticket classifier for a software company. Analyze the following support ticket description and classify it.

Respond with ONLY a valid JSON object in this exact format:
{{"category": "<category>", "priority": "<priority>"}}

Category must be one of:
- billing: payment issues, invoices, subscriptions, refunds, charges
- technical: bugs, errors, crashes, performance problems, integration failures
- account: login issues, password reset, profile changes, access permissions
- general: feature requests, general questions, feedback, anything else

Priority must be one of:
- critical: system completely down, data loss, security breach, blocking all users
- high: major feature broken, significant portion of users affected, no workaround
- medium: partial functionality affected, workaround exists, moderate impact
- low: minor cosmetic issues, general questions, feature requests, low urgency

Ticket description:
{}

Respond with ONLY the JSON object. No markdown code blocks, no explanation."#,
        description.trim()
    )
}

/// 마크다운 코드 펜스 제거
///
/// "```json ... ```" 형태면 첫 펜스 구간의 내용만 남기고 언어 태그를 제거한다.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }
    let inner = text.split("```").nth(1).unwrap_or("");
    inner.strip_prefix("json").unwrap_or(inner).trim()
}
