//! 통계 스냅샷 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ticket::{Category, Priority};

/// 티켓 컬렉션 집계 스냅샷 (요청마다 새로 계산, 캐시 없음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// 전체 티켓 수
    pub total_tickets: u64,
    /// `open` 상태 티켓 수 (≤ total_tickets)
    pub open_tickets: u64,
    /// 티켓이 존재하는 날 기준 일평균 (소수 첫째 자리 반올림)
    pub avg_tickets_per_day: f64,
    /// 우선순위별 개수: 네 키 모두 항상 존재
    pub priority_breakdown: BTreeMap<Priority, u64>,
    /// 카테고리별 개수: 네 키 모두 항상 존재
    pub category_breakdown: BTreeMap<Category, u64>,
}

impl StatsSnapshot {
    /// 빈 저장소에 해당하는 스냅샷
    pub fn empty() -> Self {
        Self {
            total_tickets: 0,
            open_tickets: 0,
            avg_tickets_per_day: 0.0,
            priority_breakdown: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
            category_breakdown: Category::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }
}
