//! # ticketdesk-app
//!
//! TicketDesk 서버 바이너리 진입점.
//! 설정 로드, 어댑터 조립(DI), 웹 서버 라이프사이클 관리.

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ticketdesk_core::config::AppConfig;
use ticketdesk_core::config_manager::ConfigManager;
use ticketdesk_core::ports::llm_provider::LlmProvider;
use ticketdesk_core::stats_aggregator::StatsAggregator;
use ticketdesk_network::ai_llm_client::RemoteLlmProvider;
use ticketdesk_network::classifier::TicketClassifier;
use ticketdesk_storage::sqlite::SqliteStorage;
use ticketdesk_web::{AppState, WebServer};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// DB 파일 이름
const DB_FILE_NAME: &str = "ticketdesk.db";

/// TicketDesk 지원 티켓 서버
///
/// 티켓 관리 REST API + LLM 기반 분류 제안
#[derive(Parser, Debug)]
#[command(name = "ticketdesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 데이터 저장 경로 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long)]
    data_dir: Option<String>,

    /// 웹 서버 포트 (설정 파일 값보다 우선)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 외부 접근 허용 (0.0.0.0 바인드)
    #[arg(long)]
    allow_external: bool,
}

/// 데이터베이스 경로 결정
///
/// 우선순위: `--data-dir` > 설정 파일 `storage.db_path` > 플랫폼 기본 경로
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.ticketdesk.server/ticketdesk.db`
/// - Windows: `%APPDATA%\ticketdesk\server\data\ticketdesk.db`
/// - Linux: `~/.local/share/ticketdesk/ticketdesk.db`
fn resolve_db_path(data_dir: Option<&str>, configured: Option<&Path>) -> PathBuf {
    data_dir
        .map(|d| PathBuf::from(d).join(DB_FILE_NAME))
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(|| {
            ProjectDirs::from("com", "ticketdesk", "server")
                .map(|p| p.data_dir().join(DB_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

/// 크레이트별 로그 필터 문자열
fn log_filter(level: &str) -> String {
    [
        "ticketdesk",
        "ticketdesk_app",
        "ticketdesk_core",
        "ticketdesk_storage",
        "ticketdesk_network",
        "ticketdesk_web",
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// CLI 인자와 환경변수를 설정에 반영
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    config
        .classifier
        .apply_env_api_key(|name| std::env::var(name).ok());

    if let Some(port) = args.port {
        config.web.port = port;
    }
    if args.allow_external {
        config.web.allow_external = true;
    }
}

/// OS 종료 시그널 대기 (SIGINT, SIGTERM), 수신한 시그널 이름 반환
#[cfg(unix)]
async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

/// Ctrl+C 대기
#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}

/// 종료 시그널이 올 때까지 웹 서버 태스크 실행
///
/// 시그널이 먼저 오면 종료 신호를 보내고 진행 중인 요청이 끝날 때까지 기다린다.
/// 서버가 먼저 끝나면 그 결과를 그대로 반환한다.
async fn serve_until<F>(
    mut server: JoinHandle<io::Result<()>>,
    signal: F,
    shutdown_tx: watch::Sender<bool>,
) -> Result<()>
where
    F: Future<Output = io::Result<&'static str>>,
{
    tokio::select! {
        result = &mut server => {
            result.context("웹 서버 태스크 실패")??;
            warn!("웹 서버가 종료 시그널 없이 종료됨");
            return Ok(());
        }
        received = signal => {
            let name = received.context("시그널 핸들러 등록 실패")?;
            info!(signal = name, "종료 시그널 수신, 진행 중인 요청 마무리");
        }
    }

    let _ = shutdown_tx.send(true);
    server.await.context("웹 서버 태스크 실패")??;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&args.log_level))),
        )
        .init();

    info!("TicketDesk 서버 시작");

    // 설정 로드
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", config_manager.config_path().display());

    let mut config = config_manager.get();
    apply_overrides(&mut config, &args);

    // 저장소
    let db_path = resolve_db_path(args.data_dir.as_deref(), config.storage.db_path.as_deref());
    let storage = Arc::new(SqliteStorage::open(&db_path).context("저장소 초기화 실패")?);

    // 분류기 (API 키가 없으면 성능 저하 모드)
    let provider = Arc::new(
        RemoteLlmProvider::new(&config.classifier).context("LLM 클라이언트 생성 실패")?,
    );
    let classifier = Arc::new(TicketClassifier::from_config(provider.clone(), &config.classifier));
    if classifier.is_available() {
        info!(model = provider.provider_name(), "AI 분류 활성화");
    } else {
        warn!("LLM API 키 미설정, AI 분류 제안 비활성화");
    }

    let state = AppState {
        store: storage.clone(),
        stats: StatsAggregator::new(storage),
        classifier,
    };

    // 웹 서버 + 종료 신호
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = WebServer::new(state, config.web.clone());
    info!("API 주소: {}/api/tickets/", server.url());

    let server_handle = tokio::spawn(server.run(shutdown_rx));
    serve_until(server_handle, wait_for_signal(), shutdown_tx).await?;

    info!("TicketDesk 서버 종료");
    Ok(())
}
