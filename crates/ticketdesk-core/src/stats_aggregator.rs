//! 통계 집계기.
//!
//! `TicketStatsSource`의 그룹 집계 결과만으로 `StatsSnapshot`을 계산한다.
//! 읽기 전용이며 상태를 갖지 않으므로 동시에 여러 번 호출해도 안전하다.
//! 스냅샷을 구성하는 쿼리들 사이의 약간의 읽기 불일치는 허용된다.

use std::sync::Arc;

use tracing::debug;

use crate::error::CoreError;
use crate::models::stats::StatsSnapshot;
use crate::models::ticket::TicketStatus;
use crate::ports::storage::TicketStatsSource;

/// 통계 집계기
#[derive(Clone)]
pub struct StatsAggregator {
    source: Arc<dyn TicketStatsSource>,
}

impl StatsAggregator {
    /// 새 집계기 생성
    pub fn new(source: Arc<dyn TicketStatsSource>) -> Self {
        Self { source }
    }

    /// 현재 저장소 상태의 스냅샷 계산
    ///
    /// 저장소 에러는 그대로 전파된다.
    pub async fn snapshot(&self) -> Result<StatsSnapshot, CoreError> {
        let mut snapshot = StatsSnapshot::empty();

        // 전체/open 개수는 같은 쿼리 결과에서 파생 → open ≤ total 보장
        let by_status = self.source.count_by_status().await?;
        snapshot.total_tickets = by_status.iter().map(|(_, n)| n).sum();
        snapshot.open_tickets = by_status
            .iter()
            .filter(|(s, _)| *s == TicketStatus::Open)
            .map(|(_, n)| n)
            .sum();

        let num_days = self.source.count_by_day().await?.len() as u64;
        snapshot.avg_tickets_per_day = average_per_day(snapshot.total_tickets, num_days);

        for (priority, count) in self.source.count_by_priority().await? {
            snapshot.priority_breakdown.insert(priority, count);
        }
        for (category, count) in self.source.count_by_category().await? {
            snapshot.category_breakdown.insert(category, count);
        }

        debug!(
            total = snapshot.total_tickets,
            open = snapshot.open_tickets,
            days = num_days,
            "통계 스냅샷 계산 완료"
        );

        Ok(snapshot)
    }
}

/// 티켓이 존재하는 날 수 기준 평균, 소수 첫째 자리 반올림. 날이 없으면 0.0
pub fn average_per_day(total: u64, num_days: u64) -> f64 {
    if num_days == 0 {
        return 0.0;
    }
    let avg = total as f64 / num_days as f64;
    (avg * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ticket::{Category, Priority};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 고정된 그룹 결과를 반환하는 가짜 집계 소스
    #[derive(Default)]
    struct FixedSource {
        by_status: Vec<(TicketStatus, u64)>,
        by_day: Vec<(NaiveDate, u64)>,
        by_priority: Vec<(Priority, u64)>,
        by_category: Vec<(Category, u64)>,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl TicketStatsSource for FixedSource {
        async fn count_by_status(&self) -> Result<Vec<(TicketStatus, u64)>, CoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.by_status.clone())
        }
        async fn count_by_day(&self) -> Result<Vec<(NaiveDate, u64)>, CoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.by_day.clone())
        }
        async fn count_by_priority(&self) -> Result<Vec<(Priority, u64)>, CoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.by_priority.clone())
        }
        async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, CoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.by_category.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TicketStatsSource for FailingSource {
        async fn count_by_status(&self) -> Result<Vec<(TicketStatus, u64)>, CoreError> {
            Err(CoreError::Internal("DB 잠김".to_string()))
        }
        async fn count_by_day(&self) -> Result<Vec<(NaiveDate, u64)>, CoreError> {
            Ok(vec![])
        }
        async fn count_by_priority(&self) -> Result<Vec<(Priority, u64)>, CoreError> {
            Ok(vec![])
        }
        async fn count_by_category(&self) -> Result<Vec<(Category, u64)>, CoreError> {
            Ok(vec![])
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn empty_store_snapshot() {
        let aggregator = StatsAggregator::new(Arc::new(FixedSource::default()));
        let snap = aggregator.snapshot().await.unwrap();
        assert_eq!(snap, StatsSnapshot::empty());
        assert_eq!(snap.avg_tickets_per_day, 0.0);
    }

    #[tokio::test]
    async fn two_days_four_open_tickets() {
        let source = FixedSource {
            by_status: vec![(TicketStatus::Open, 4)],
            by_day: vec![(day(1), 3), (day(2), 1)],
            by_priority: vec![(Priority::High, 3), (Priority::Low, 1)],
            by_category: vec![(Category::Technical, 4)],
            ..Default::default()
        };
        let aggregator = StatsAggregator::new(Arc::new(source));
        let snap = aggregator.snapshot().await.unwrap();

        assert_eq!(snap.total_tickets, 4);
        assert_eq!(snap.open_tickets, 4);
        assert_eq!(snap.avg_tickets_per_day, 2.0);
        assert_eq!(snap.priority_breakdown[&Priority::Low], 1);
        assert_eq!(snap.priority_breakdown[&Priority::Medium], 0);
        assert_eq!(snap.priority_breakdown[&Priority::High], 3);
        assert_eq!(snap.priority_breakdown[&Priority::Critical], 0);
        assert_eq!(snap.category_breakdown[&Category::Technical], 4);
        assert_eq!(snap.category_breakdown[&Category::Billing], 0);
    }

    #[tokio::test]
    async fn open_count_excludes_other_statuses() {
        let source = FixedSource {
            by_status: vec![
                (TicketStatus::Open, 2),
                (TicketStatus::Closed, 5),
                (TicketStatus::InProgress, 1),
            ],
            by_day: vec![(day(1), 8)],
            ..Default::default()
        };
        let snap = StatsAggregator::new(Arc::new(source))
            .snapshot()
            .await
            .unwrap();
        assert_eq!(snap.total_tickets, 8);
        assert_eq!(snap.open_tickets, 2);
        assert_eq!(snap.avg_tickets_per_day, 8.0);
    }

    #[tokio::test]
    async fn constant_number_of_queries() {
        let source = Arc::new(FixedSource {
            by_status: vec![(TicketStatus::Open, 1000)],
            by_day: (1..=20).map(|d| (day(d), 50)).collect(),
            ..Default::default()
        });
        let aggregator = StatsAggregator::new(source.clone());
        aggregator.snapshot().await.unwrap();
        assert_eq!(source.queries.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn repeated_snapshots_are_identical() {
        let source = FixedSource {
            by_status: vec![(TicketStatus::Open, 3), (TicketStatus::Resolved, 4)],
            by_day: vec![(day(1), 4), (day(5), 2), (day(9), 1)],
            by_priority: vec![(Priority::Critical, 7)],
            by_category: vec![(Category::General, 7)],
            ..Default::default()
        };
        let aggregator = StatsAggregator::new(Arc::new(source));
        let first = aggregator.snapshot().await.unwrap();
        let second = aggregator.snapshot().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.avg_tickets_per_day, 2.3);
    }

    #[tokio::test]
    async fn store_error_propagates() {
        let aggregator = StatsAggregator::new(Arc::new(FailingSource));
        let result = aggregator.snapshot().await;
        assert!(matches!(result, Err(CoreError::Internal(_))));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_per_day(0, 0), 0.0);
        assert_eq!(average_per_day(5, 0), 0.0);
        assert_eq!(average_per_day(10, 3), 3.3);
        assert_eq!(average_per_day(5, 3), 1.7);
        assert_eq!(average_per_day(1, 4), 0.3);
    }
}
