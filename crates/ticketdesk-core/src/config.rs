//! 애플리케이션 설정 구조체.
//!
//! 저장소 경로, 웹 서버, 분류기(외부 LLM API) 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하며, API 키는 환경변수로 덮어쓸 수 있다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// API 키 환경변수 (우선)
pub const API_KEY_ENV: &str = "TICKETDESK_LLM_API_KEY";

/// API 키 환경변수 (폴백)
pub const FALLBACK_API_KEY_ENV: &str = "GROQ_API_KEY";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 웹 API 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 티켓 분류기 설정
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite DB 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 API 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 8000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// 분류기 (외부 LLM API) 설정
// ============================================================

/// 티켓 분류기 설정: OpenAI 호환 Chat Completions 엔드포인트
///
/// API 키가 비어 있으면 분류 기능만 비활성화되고 나머지 기능은 정상 동작한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// API URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// API 키 (비어 있으면 성능 저하 모드)
    #[serde(default)]
    pub api_key: String,
    /// 모델 이름
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    /// 샘플링 온도
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 최대 출력 토큰 수
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ClassifierConfig {
    /// API 키 설정 여부
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 환경변수 값으로 API 키 덮어쓰기
    ///
    /// `TICKETDESK_LLM_API_KEY`가 우선이며, 없으면 `GROQ_API_KEY`를 사용한다.
    /// 둘 다 없거나 비어 있으면 기존 값을 유지한다.
    pub fn apply_env_api_key(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let from_env = [API_KEY_ENV, FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty());
        if let Some(key) = from_env {
            self.api_key = key.trim().to_string();
        }
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_web_port() -> u16 {
    8000
}
fn default_llm_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}
fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_llm_timeout_secs() -> u64 {
    10
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    64
}
