//! # ticketdesk-core
//!
//! TicketDesk 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/기본값 생성)
//! - [`stats_aggregator`]: 그룹 집계 기반 통계 스냅샷 계산

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod stats_aggregator;
