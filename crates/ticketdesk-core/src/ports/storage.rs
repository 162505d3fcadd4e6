//! 티켓 저장소 포트.
//!
//! 구현: `ticketdesk-storage` crate (rusqlite)

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CoreError;
use crate::models::ticket::{
    Category, NewTicket, Priority, Ticket, TicketFilter, TicketPatch, TicketStatus,
};

/// 티켓 저장소: 생성/조회/부분 업데이트/필터 목록
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// 티켓 생성 (ID와 생성 시각은 저장소가 부여)
    async fn create_ticket(&self, new: &NewTicket) -> Result<Ticket, CoreError>;

    /// ID로 티켓 조회
    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, CoreError>;

    /// 부분 업데이트: 티켓이 없으면 `None`
    async fn update_ticket(&self, id: i64, patch: &TicketPatch)
        -> Result<Option<Ticket>, CoreError>;

    /// 필터 조건으로 목록 조회 (최신순)
    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, CoreError>;
}

/// 통계용 그룹 집계 읽기 포트
///
/// 각 메서드는 저장소 쿼리 한 번(GROUP BY)으로 처리되어야 하며,
/// 전체 행을 메모리로 가져오지 않는다.
#[async_trait]
pub trait TicketStatsSource: Send + Sync {
    /// 상태별 개수
    async fn count_by_status(&self) -> Result<Vec<(TicketStatus, u64)>, CoreError>;

    /// 생성일(달력 일) 별 개수: 티켓이 있는 날만 포함
    async fn count_by_day(&self) -> Result<Vec<(NaiveDate, u64)>, CoreError>;

    /// 우선순위별 개수: 관측된 값만 포함
    async fn count_by_priority(&self) -> Result<Vec<(Priority, u64)>, CoreError>;

    /// 카테고리별 개수: 관측된 값만 포함
    async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, CoreError>;
}
