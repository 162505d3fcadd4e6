//! LLM 제공자 포트.
//!
//! 티켓 분류에 사용하는 텍스트 생성 모델 인터페이스를 정의한다.
//! 요청은 단일 user 메시지 하나이며 응답은 단일 텍스트 완성이다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 텍스트 완성 요청
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// user 역할 메시지로 전송할 프롬프트
    pub prompt: String,
    /// 샘플링 온도
    pub temperature: f32,
    /// 최대 출력 토큰 수
    pub max_tokens: u32,
}

/// LLM 제공자: 단일 프롬프트 완성
///
/// 구현체: `RemoteLlmProvider` (OpenAI 호환 Chat Completions API)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// 프롬프트를 전송하고 원시 텍스트 응답 반환
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CoreError>;

    /// 자격증명이 설정되어 호출 가능한 상태인지 여부
    ///
    /// `false`이면 호출자는 네트워크 요청 없이 즉시 포기해야 한다.
    fn is_configured(&self) -> bool;

    /// 제공자 이름 (로그용, 예: 모델 이름)
    fn provider_name(&self) -> &str;
}
