//! # ticketdesk-web
//!
//! TicketDesk REST API 서버.
//! Axum 기반 JSON API.
//!
//! ## 기능
//! - 티켓 목록(필터/검색), 생성, 조회, 부분 업데이트
//! - 통계 스냅샷 조회
//! - 설명 기반 AI 분류 제안 (LLM 미사용 시에도 200 응답)

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use ticketdesk_core::config::WebConfig;
use ticketdesk_core::ports::storage::TicketStore;
use ticketdesk_core::stats_aggregator::StatsAggregator;
use ticketdesk_network::classifier::TicketClassifier;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 티켓 저장소
    pub store: Arc<dyn TicketStore>,
    /// 통계 집계기
    pub stats: StatsAggregator,
    /// 티켓 분류기
    pub classifier: Arc<TicketClassifier>,
}

/// 전체 라우터 구성 (`/api` 하위 + CORS + 요청 추적)
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// REST API 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState, config: WebConfig) -> Self {
        Self { config, state }
    }

    /// 바인드 주소 (allow_external=false면 127.0.0.1)
    pub fn bind_addr(&self) -> SocketAddr {
        let host = if self.config.allow_external {
            [0, 0, 0, 0]
        } else {
            [127, 0, 0, 1]
        };
        SocketAddr::from((host, self.config.port))
    }

    /// 서버 실행
    ///
    /// `shutdown_rx`에 `true`가 전달되거나 송신측이 닫히면 진행 중인 요청을 마치고 종료한다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let addr = self.bind_addr();
        let listener = TcpListener::bind(addr).await?;
        info!("API 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("API 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("API 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
