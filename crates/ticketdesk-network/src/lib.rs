//! # ticketdesk-network
//!
//! 외부 LLM 네트워크 어댑터.
//! OpenAI 호환 Chat Completions API 호출과, 그 위에서 동작하는
//! 티켓 분류기(프롬프트 구성, 코드 펜스 제거, 응답 검증, 성능 저하 모드)를 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ticketdesk_network::ai_llm_client::RemoteLlmProvider;
//! use ticketdesk_network::classifier::TicketClassifier;
//!
//! let provider = Arc::new(RemoteLlmProvider::new(&config.classifier)?);
//! let classifier = TicketClassifier::from_config(provider, &config.classifier);
//! let suggestion = classifier.classify("결제가 두 번 청구되었습니다").await;
//! ```

pub mod ai_llm_client;
pub mod classifier;
