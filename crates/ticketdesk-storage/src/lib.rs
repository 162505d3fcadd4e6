//! # ticketdesk-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 기반 티켓 저장, 통계용 그룹 집계 쿼리,
//! 스키마 마이그레이션을 관리한다.
//!
//! ## 모듈
//! - `sqlite`: 티켓 저장소 (TicketStore + TicketStatsSource 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
