//! 실시간 VWAP 계산 라이브러리
//!
//! 거래 피드를 순차적으로 소비하며 심볼별 최근 N건 윈도우의 거래량 가중 평균 가격을 계산합니다.

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod listener;
pub mod models;
pub mod utils;

// 핵심 타입 재노출
pub use crate::engine::VwapComputer;
pub use crate::error::{FeedError, ParseError, TradeField, VwapError};
pub use crate::feed::{CoinbaseFeed, ReplayFeed, TradeFeed};
pub use crate::listener::{ListenSummary, Listener, ReconnectPolicy};
pub use crate::models::snapshot::VwapSnapshot;
pub use crate::models::trade::Trade;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, VwapError>;
