//! 공용 유틸리티
//!
//! 시간, 십진수 파싱, 로깅 함수 제공

pub mod decimal;
pub mod logging;

use chrono::{DateTime, Utc};

/// DateTime<Utc>를 타임스탬프(밀리초)로 변환
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
  dt.timestamp() * 1000 + dt.timestamp_subsec_millis() as i64
}

/// 현재 시간을 타임스탬프(밀리초)로 반환
pub fn current_timestamp_ms() -> i64 {
  datetime_to_timestamp(Utc::now())
}
