//! 티켓 스토리지 (TicketStore 포트 구현).
//!
//! 티켓 생성, 단건 조회, 부분 업데이트, 필터/검색 목록.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::models::ticket::{NewTicket, Ticket, TicketFilter, TicketPatch};
use ticketdesk_core::ports::storage::TicketStore;
use tracing::debug;

use super::{map_write_error, parse_enum_column, parse_timestamp_column, SqliteStorage};

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, category, priority, status, created_at FROM tickets";

/// 저장 형식: 사전식 정렬이 시간순과 일치하도록 고정 자릿수 UTC
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// LIKE 와일드카드 이스케이프
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: parse_enum_column(row, 3)?,
        priority: parse_enum_column(row, 4)?,
        status: parse_enum_column(row, 5)?,
        created_at: parse_timestamp_column(row, 6)?,
    })
}

fn select_by_id(conn: &Connection, id: i64) -> Result<Option<Ticket>, CoreError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        row_to_ticket,
    )
    .optional()
    .map_err(|e| CoreError::Internal(format!("티켓 조회 실패: {e}")))
}

impl SqliteStorage {
    /// 생성 시각을 지정하여 티켓 저장 (데이터 이관/테스트용)
    pub fn create_ticket_at(
        &self,
        new: &NewTicket,
        created_at: DateTime<Utc>,
    ) -> Result<Ticket, CoreError> {
        let new = new.validated()?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO tickets (title, description, category, priority, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.title,
                new.description,
                new.category.as_str(),
                new.priority.as_str(),
                new.status.as_str(),
                format_timestamp(&created_at),
            ],
        )
        .map_err(|e| map_write_error("티켓 저장 실패", e))?;

        let id = conn.last_insert_rowid();
        debug!(id, category = %new.category, priority = %new.priority, "티켓 생성");

        select_by_id(&conn, id)?.ok_or_else(|| CoreError::NotFound {
            resource_type: "Ticket".to_string(),
            id: id.to_string(),
        })
    }

    fn update_ticket_sync(&self, id: i64, patch: &TicketPatch) -> Result<Option<Ticket>, CoreError> {
        let patch = patch.validated()?;
        let mut conn = self.lock()?;

        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Internal(format!("트랜잭션 시작 실패: {e}")))?;

        let Some(mut ticket) = select_by_id(&tx, id)? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(ticket));
        }

        patch.apply_to(&mut ticket);

        tx.execute(
            "UPDATE tickets
             SET title = ?1, description = ?2, category = ?3, priority = ?4, status = ?5
             WHERE id = ?6",
            params![
                ticket.title,
                ticket.description,
                ticket.category.as_str(),
                ticket.priority.as_str(),
                ticket.status.as_str(),
                id,
            ],
        )
        .map_err(|e| map_write_error("티켓 업데이트 실패", e))?;

        tx.commit()
            .map_err(|e| CoreError::Internal(format!("트랜잭션 커밋 실패: {e}")))?;

        debug!(id, status = %ticket.status, "티켓 업데이트");
        Ok(Some(ticket))
    }

    fn list_tickets_sync(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, CoreError> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(category) = filter.category {
            clauses.push("category = ?");
            values.push(category.as_str().to_string());
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            values.push(priority.as_str().to_string());
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(search) = filter.search_term() {
            clauses.push(
                "(title LIKE '%' || ? || '%' ESCAPE '\\' OR description LIKE '%' || ? || '%' ESCAPE '\\')",
            );
            let needle = escape_like(search);
            values.push(needle.clone());
            values.push(needle);
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoreError::Internal(format!("쿼리 준비 실패: {e}")))?;

        let tickets = stmt
            .query_map(params_from_iter(values.iter()), row_to_ticket)
            .map_err(|e| CoreError::Internal(format!("쿼리 실행 실패: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Internal(format!("티켓 행 변환 실패: {e}")))?;

        debug!(count = tickets.len(), "티켓 목록 조회");
        Ok(tickets)
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, CoreError> {
        self.create_ticket_at(new, Utc::now())
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, CoreError> {
        let conn = self.lock()?;
        select_by_id(&conn, id)
    }

    async fn update_ticket(
        &self,
        id: i64,
        patch: &TicketPatch,
    ) -> Result<Option<Ticket>, CoreError> {
        self.update_ticket_sync(id, patch)
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, CoreError> {
        self.list_tickets_sync(filter)
    }
}
