//! 통계 집계 쿼리 (TicketStatsSource 포트 구현).
//!
//! 각 메서드는 GROUP BY 쿼리 한 번으로 처리된다.

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::ticket::{Category, Priority, TicketStatus};
use ticketdesk_core::ports::storage::TicketStatsSource;

use super::{parse_enum_column, SqliteStorage};

fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let count: i64 = row.get(idx)?;
    Ok(count.max(0) as u64)
}

impl SqliteStorage {
    /// `SELECT <key>, COUNT(*) ... GROUP BY` 형태의 쿼리 실행
    fn grouped_count<T>(
        &self,
        sql: &str,
        parse_key: impl Fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<(T, u64)>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CoreError::Internal(format!("집계 쿼리 준비 실패: {e}")))?;

        let rows = stmt
            .query_map([], |row| Ok((parse_key(row)?, count_column(row, 1)?)))
            .map_err(|e| CoreError::Internal(format!("집계 쿼리 실행 실패: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Internal(format!("집계 행 변환 실패: {e}")))?;

        Ok(rows)
    }

    fn grouped_enum_count<T>(&self, column: &str) -> Result<Vec<(T, u64)>, CoreError>
    where
        T: FromStr<Err = CoreError>,
    {
        let sql = format!("SELECT {column}, COUNT(*) FROM tickets GROUP BY {column}");
        self.grouped_count(&sql, |row| parse_enum_column(row, 0))
    }
}

#[async_trait]
impl TicketStatsSource for SqliteStorage {
    async fn count_by_status(&self) -> Result<Vec<(TicketStatus, u64)>, CoreError> {
        self.grouped_enum_count("status")
    }

    async fn count_by_day(&self) -> Result<Vec<(NaiveDate, u64)>, CoreError> {
        self.grouped_count(
            "SELECT date(created_at) AS day, COUNT(*) FROM tickets GROUP BY day ORDER BY day",
            |row| {
                let raw: String = row.get(0)?;
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })
            },
        )
    }

    async fn count_by_priority(&self) -> Result<Vec<(Priority, u64)>, CoreError> {
        self.grouped_enum_count("priority")
    }

    async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, CoreError> {
        self.grouped_enum_count("category")
    }
}
