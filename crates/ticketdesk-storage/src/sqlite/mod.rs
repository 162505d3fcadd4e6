//! SQLite 저장소 어댑터.
//!
//! `TicketStore` + `TicketStatsSource` 포트 구현.
//!
//! # 모듈 구조
//! - `tickets`: 티켓 생성/조회/부분 업데이트/필터 목록 (TicketStore 포트)
//! - `stats`: 상태/일자/우선순위/카테고리별 그룹 집계 (TicketStatsSource 포트)

mod stats;
mod tickets;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use ticketdesk_core::error::CoreError;
use tracing::info;

use crate::migration;

/// SQLite 저장소: `TicketStore` + `TicketStatsSource` 포트 구현
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Internal(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| CoreError::Internal(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Internal(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Internal(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Internal(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 연결 잠금 획득
    pub(super) fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))
    }
}

/// 쓰기 에러 변환: 제약 위반은 검증 실패로 취급
pub(super) fn map_write_error(context: &str, err: rusqlite::Error) -> CoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
            CoreError::validation(
                "ticket",
                msg.clone().unwrap_or_else(|| "제약 조건 위반".to_string()),
            )
        }
        _ => CoreError::Internal(format!("{context}: {err}")),
    }
}

/// 닫힌 enum 컬럼 파싱
pub(super) fn parse_enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// RFC3339 타임스탬프 컬럼 파싱
pub(super) fn parse_timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
