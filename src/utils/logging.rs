//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use std::env;

use env_logger::Builder;
use log::LevelFilter;

use crate::error::{FeedError, ParseError, VwapError};

/// 로그 레벨 문자열 파싱 (알 수 없는 값은 Info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
///
/// `RUST_LOG` 환경변수가 있으면 설정값보다 우선합니다.
pub fn init(default_level: &str) -> Result<(), VwapError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
      .filter_level(parse_level(&log_level))
      .format_timestamp_millis()
      .try_init()
      .map_err(|e| VwapError::LoggingError(e.to_string()))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 리스너 시작 로그
pub fn log_listener_start(window_size: usize, throttle_ms: u128) {
    log::info!("리스너 시작 - 윈도우 크기: {} - 간격: {}ms", window_size, throttle_ms);
}

/// 리스너 종료 로그
pub fn log_listener_stop(processed: usize, rejected: usize) {
    log::info!("리스너 종료 - 처리: {} - 거부: {}", processed, rejected);
}

/// 파싱 불가 거래 로그
pub fn log_trade_rejected(id: i64, symbol: &str, error: &ParseError) {
    log::warn!("거래 거부: id={} 심볼={} - {}", id, symbol, error);
}

/// 피드 오류 로그
pub fn log_error(context: &str, error: &FeedError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
