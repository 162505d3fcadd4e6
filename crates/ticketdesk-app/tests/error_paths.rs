//! Cross-crate 에러 경로 테스트.
//!
//! 설정, 저장소, 분류기 경계에서의 에러 전파와 성능 저하 모드를 검증한다.

use std::sync::Arc;
use tempfile::TempDir;
use ticketdesk_core::config::{ClassifierConfig, API_KEY_ENV, FALLBACK_API_KEY_ENV};
use ticketdesk_core::config_manager::ConfigManager;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::ticket::{TicketPatch, TicketStatus};
use ticketdesk_core::ports::llm_provider::LlmProvider;
use ticketdesk_core::ports::storage::TicketStore;
use ticketdesk_network::ai_llm_client::RemoteLlmProvider;
use ticketdesk_network::classifier::TicketClassifier;
use ticketdesk_storage::sqlite::SqliteStorage;

#[test]
fn malformed_config_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"web": {"port": "not-a-number"}}"#).unwrap();

    let result = ConfigManager::with_path(path);
    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[test]
fn config_file_key_and_env_override() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"classifier": {"api_key": "from_file"}}"#).unwrap();

    let mut config = ConfigManager::with_path(path).unwrap().get();
    assert!(config.classifier.has_api_key());

    config.classifier.apply_env_api_key(|name| match name {
        API_KEY_ENV => None,
        FALLBACK_API_KEY_ENV => Some("gsk_env".to_string()),
        _ => None,
    });
    assert_eq!(config.classifier.api_key, "gsk_env");

    let provider = RemoteLlmProvider::new(&config.classifier).unwrap();
    assert!(provider.is_configured());
}

#[tokio::test]
async fn unreachable_provider_yields_none() {
    // 예약된 포트로 연결 실패 유도
    let config = ClassifierConfig {
        endpoint: "http://127.0.0.1:9/chat/completions".to_string(),
        api_key: "gsk_test".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let provider = Arc::new(RemoteLlmProvider::new(&config).unwrap());
    let classifier = TicketClassifier::from_config(provider, &config);

    assert!(classifier.is_available());
    assert!(classifier.classify("cannot reset password").await.is_none());
}

#[tokio::test]
async fn update_missing_ticket_is_none_not_error() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let result = storage
        .update_ticket(
            404,
            &TicketPatch {
                status: Some(TicketStatus::Resolved),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Ok(None)));
}

#[test]
fn storage_open_on_file_path_parent_fails() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let result = SqliteStorage::open(&blocker.join("ticketdesk.db"));
    assert!(result.is_err());
}
