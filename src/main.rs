/**
* filename : main
* author : HAMA
* date: 2025. 6. 2.
* description:
**/

use tokio::sync::watch;

use xVwap::config::{Config, DEFAULT_CONFIG_PATH};
use xVwap::utils::logging;
use xVwap::{CoinbaseFeed, Listener, VwapComputer};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 명령줄 인수: 설정 파일 경로 (선택)
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);

    // 설정 로드
    let config = Config::load_from(config_path)?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("VWAP 계산기 시작 (v{})...", xVwap::VERSION);

    // Ctrl+C -> 종료 신호
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Ctrl+C 핸들러 설치 실패: {}", e);
            return;
        }
        log::info!("종료 요청 수신");
        let _ = shutdown_tx.send(true);
    });

    run(config, shutdown_rx).await
}

/// 피드 실패 시 설정된 연속 실패 횟수까지 재연결하며 계산기 상태는 유지
async fn run(config: Config, shutdown: watch::Receiver<bool>) -> Result<(), anyhow::Error> {
    let mut engine = VwapComputer::new(config.engine.window_size)?;
    let mut listener = Listener::new(config.throttle());

    let make_feed = || CoinbaseFeed::new(config.feed.url.clone(), config.feed.product_ids.clone());
    let summary = listener
        .run_with_reconnect(&mut engine, make_feed, config.reconnect_policy(), shutdown)
        .await?;

    log::info!("정상 종료: 처리 {} 건, 거부 {} 건", summary.processed, summary.rejected);
    Ok(())
}
