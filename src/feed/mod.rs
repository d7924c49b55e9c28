//! 거래 피드
//!
//! 실시간 체결 데이터를 공급하는 외부 소스 추상화

pub mod coinbase;
pub mod mocks;

use async_trait::async_trait;

use crate::error::FeedError;
use crate::models::trade::Trade;

pub use coinbase::CoinbaseFeed;
pub use mocks::ReplayFeed;

/// The `TradeFeed` trait is the contract between the listener and a trade source.
///
/// `subscribe` is called exactly once before any `read`; `turn_off` is called once
/// when the listener shuts down.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeFeed: Send {
    /// Establish the stream
    async fn subscribe(&mut self) -> Result<(), FeedError>;

    /// Wait for the next trade, in arrival order
    async fn read(&mut self) -> Result<Trade, FeedError>;

    /// Release resources (best-effort)
    async fn turn_off(&mut self) -> Result<(), FeedError>;
}
