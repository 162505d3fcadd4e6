//! 외부 AI LLM 클라이언트.
//!
//! OpenAI 호환 Chat Completions API(기본: Groq)를 호출하여
//! 단일 user 메시지에 대한 텍스트 완성을 받아온다.
//! 응답 본문 해석(JSON 추출/검증)은 호출자(`TicketClassifier`) 책임이다.

use async_trait::async_trait;
use tracing::{debug, warn};

use ticketdesk_core::config::ClassifierConfig;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::ports::llm_provider::{CompletionRequest, LlmProvider};

// ============================================================
// RemoteLlmProvider: 외부 AI LLM 클라이언트
// ============================================================

/// 외부 AI LLM 클라이언트: `POST {endpoint}` (OpenAI 호환)
///
/// API 키가 비어 있어도 생성은 성공하며, `is_configured()`가 `false`를 반환한다.
/// 호출자는 이 값을 보고 네트워크 요청 없이 포기한다.
#[derive(Debug)]
pub struct RemoteLlmProvider {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// API 엔드포인트 URL
    endpoint: String,
    /// API 키 (메모리에만 유지)
    api_key: String,
    /// 모델 이름
    model: String,
}

impl RemoteLlmProvider {
    /// 새 RemoteLlmProvider 생성
    pub fn new(config: &ClassifierConfig) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout = config.timeout_secs,
            configured = config.has_api_key(),
            "RemoteLlmProvider 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }

    /// 요청 본문 구성: 단일 user 메시지
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": request.prompt
            }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        })
    }

    /// OpenAI 응답에서 `choices[0].message.content` 추출
    fn parse_completion_text(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::Internal(format!("LLM 응답 JSON 파싱 실패: {}", e)))?;

        response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| CoreError::Internal("LLM 응답에서 텍스트를 찾을 수 없음".to_string()))
    }
}

#[async_trait]
impl LlmProvider for RemoteLlmProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CoreError> {
        if !self.is_configured() {
            return Err(CoreError::Config("LLM API 키 미설정".to_string()));
        }

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = request.prompt.len(),
            "외부 LLM API 호출"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(request))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("LLM API 호출 실패: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("LLM API 응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "LLM API 오류 응답");
            return Err(CoreError::Network(format!(
                "LLM API 오류 ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = Self::parse_completion_text(&body)?;
        debug!(len = text.len(), "LLM 응답 수신");
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

// ============================================================
// 테스트
// ============================================================
