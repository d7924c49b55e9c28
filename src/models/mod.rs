//! 도메인 데이터 모델

pub mod snapshot;
pub mod trade;

pub use snapshot::VwapSnapshot;
pub use trade::Trade;
