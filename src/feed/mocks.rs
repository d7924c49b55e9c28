use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::FeedError;
use crate::feed::TradeFeed;
use crate::models::trade::Trade;

/// A replaying implementation of the TradeFeed trait for testing and demos
///
/// Each instance owns its own queue of trades. Optional failure injection lets tests
/// exercise the listener's error paths.
pub struct ReplayFeed {
    trades: VecDeque<Trade>,
    fail_subscribe: bool,
    fail_after: Option<usize>,
    stop_when_drained: Option<watch::Sender<bool>>,
    subscribed: bool,
    subscribe_calls: usize,
    read_calls: usize,
    turn_off_calls: usize,
}

impl ReplayFeed {
    pub fn new(trades: impl IntoIterator<Item = Trade>) -> Self {
        ReplayFeed {
            trades: trades.into_iter().collect(),
            fail_subscribe: false,
            fail_after: None,
            stop_when_drained: None,
            subscribed: false,
            subscribe_calls: 0,
            read_calls: 0,
            turn_off_calls: 0,
        }
    }

    /// `subscribe`가 실패하도록 설정
    pub fn fail_subscribe(mut self) -> Self {
        self.fail_subscribe = true;
        self
    }

    /// `reads`건을 돌려준 다음 읽기는 실패
    pub fn fail_after(mut self, reads: usize) -> Self {
        self.fail_after = Some(reads);
        self
    }

    /// 마지막 거래를 돌려줄 때 종료 신호 전송
    pub fn stop_when_drained(mut self, shutdown: watch::Sender<bool>) -> Self {
        self.stop_when_drained = Some(shutdown);
        self
    }

    pub fn remaining(&self) -> usize {
        self.trades.len()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    pub fn turn_off_calls(&self) -> usize {
        self.turn_off_calls
    }
}

#[async_trait]
impl TradeFeed for ReplayFeed {
    async fn subscribe(&mut self) -> Result<(), FeedError> {
        self.subscribe_calls += 1;

        if self.fail_subscribe {
            return Err(FeedError::Subscribe("replay feed refused subscription".to_string()));
        }

        self.subscribed = true;
        Ok(())
    }

    async fn read(&mut self) -> Result<Trade, FeedError> {
        if !self.subscribed {
            return Err(FeedError::NotSubscribed);
        }

        self.read_calls += 1;

        if let Some(limit) = self.fail_after {
            if self.read_calls > limit {
                return Err(FeedError::Read("unexpected websocket error".to_string()));
            }
        }

        let trade = self.trades.pop_front().ok_or(FeedError::Closed)?;

        if self.trades.is_empty() {
            if let Some(shutdown) = &self.stop_when_drained {
                let _ = shutdown.send(true);
            }
        }

        Ok(trade)
    }

    async fn turn_off(&mut self) -> Result<(), FeedError> {
        self.turn_off_calls += 1;
        self.subscribed = false;
        Ok(())
    }
}
