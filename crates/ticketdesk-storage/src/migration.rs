//! 스키마 마이그레이션.
//!
//! 버전 기반 SQLite 스키마 관리.

use rusqlite::Connection;
use tracing::{debug, info};

/// 현재 스키마 버전
const CURRENT_VERSION: u32 = 1;

/// 스키마 마이그레이션 실행
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = get_version(conn)?;
    info!("현재 스키마 버전: {current}, 목표: {CURRENT_VERSION}");

    if current < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// 현재 스키마 버전 조회
fn get_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    let result: Result<u32, _> = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    );
    result.or(Ok(0))
}

/// V1: tickets 테이블 생성
///
/// 카테고리/우선순위/상태는 CHECK 제약으로 닫힌 집합만 허용한다.
fn migrate_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    debug!("마이그레이션 V1 실행: tickets 테이블");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tickets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 200),
            description TEXT NOT NULL CHECK (length(description) >= 1),
            category TEXT NOT NULL
                CHECK (category IN ('billing', 'technical', 'account', 'general')),
            priority TEXT NOT NULL
                CHECK (priority IN ('low', 'medium', 'high', 'critical')),
            status TEXT NOT NULL DEFAULT 'open'
                CHECK (status IN ('open', 'in_progress', 'resolved', 'closed')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tickets_category ON tickets(category);
        CREATE INDEX IF NOT EXISTS idx_tickets_priority ON tickets(priority);
        CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
        CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets(created_at);

        -- 버전 기록
        INSERT INTO schema_version (version) VALUES (1);
        ",
    )?;

    info!("마이그레이션 V1 완료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_exists(conn: &Connection, name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn migration_creates_tickets_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='tickets'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        for index in [
            "idx_tickets_category",
            "idx_tickets_priority",
            "idx_tickets_status",
            "idx_tickets_created_at",
        ] {
            assert!(index_exists(&conn, index), "인덱스 누락: {index}");
        }
    }

    #[test]
    fn migration_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap(); // 두 번 실행해도 에러 없음

        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn check_constraint_rejects_unknown_category() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO tickets (title, description, category, priority, created_at)
             VALUES ('t', 'd', 'urgent', 'high', '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO tickets (title, description, category, priority, status, created_at)
             VALUES ('t', 'd', 'billing', 'high', 'archived', '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn status_defaults_to_open() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO tickets (title, description, category, priority, created_at)
             VALUES ('t', 'd', 'billing', 'low', '2025-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let status: String = conn
            .query_row("SELECT status FROM tickets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "open");
    }
}
