/**
* filename : error
* author : HAMA
* date: 2025. 6. 2.
* description:
**/

use std::fmt;

use thiserror::Error;

/// 거래 필드 구분 (파싱 오류 보고용)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeField {
    Volume,
    Price,
}

impl fmt::Display for TradeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeField::Volume => write!(f, "volume"),
            TradeField::Price => write!(f, "price"),
        }
    }
}

/// 단일 거래의 수치 필드 파싱 실패
///
/// `compute` 호출 하나에만 영향을 주며, 집계 상태는 변경되지 않습니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid {field} {value:?}: not decimal notation")]
    InvalidNotation { field: TradeField, value: String },

    #[error("Invalid {field} {value:?}: out of range (negative, non-finite or beyond 28-29 significant digits)")]
    OutOfRange { field: TradeField, value: String },
}

impl ParseError {
    pub fn field(&self) -> TradeField {
        match self {
            ParseError::InvalidNotation { field, .. } | ParseError::OutOfRange { field, .. } => *field,
        }
    }
}

/// 거래 피드 오류 (구독/수신/해제)
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Teardown failed: {0}")]
    Teardown(String),

    #[error("Not subscribed")]
    NotSubscribed,

    #[error("Feed closed")]
    Closed,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum VwapError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
