//! 거래 피드 소비 루프
//!
//! 피드에서 거래를 순서대로 읽어 계산기에 반영하고, 거래마다 스냅샷을 남깁니다.
//!
//! 종료 신호는 매 반복마다 읽기 직전에 확인합니다. 이미 대기 중인 `read()`는
//! 중단되지 않으므로 종료 지연은 최대 피드 읽기 한 번입니다. 반복 사이의 대기 시간은
//! 종료 신호와 경쟁하여 즉시 끝납니다.

use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, watch};

use crate::engine::computer::VwapComputer;
use crate::error::FeedError;
use crate::feed::TradeFeed;
use crate::models::snapshot::VwapSnapshot;
use crate::utils::current_timestamp_ms;
use crate::utils::logging::{log_error, log_listener_start, log_listener_stop, log_trade_rejected};

/// 정상 종료 시 처리 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenSummary {
    /// 계산기에 반영된 거래 수
    pub processed: usize,
    /// 파싱 실패로 거부된 거래 수
    pub rejected: usize,
}

/// 피드 실패 후 재연결 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// 연속 실패 허용 횟수 (거래를 한 건이라도 읽은 연결이 있으면 초기화)
    pub max_attempts: u32,
    /// 재연결 전 대기 시간
    pub delay: Duration,
}

const PROGRESS_BUFFER: usize = 64;

/// 피드 소비 루프
pub struct Listener {
    /// 반복 간 고정 대기 시간
    throttle: Duration,
    /// 스냅샷 구독자 채널
    publisher: Option<broadcast::Sender<VwapSnapshot>>,
}

impl Listener {
    pub fn new(throttle: Duration) -> Self {
        Listener {
            throttle,
            publisher: None,
        }
    }

    /// 스냅샷 수신기 얻기 (채널이 없으면 생성)
    pub fn subscribe_snapshots(&mut self, buffer_size: usize) -> broadcast::Receiver<VwapSnapshot> {
        match &self.publisher {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(buffer_size.max(1));
                self.publisher = Some(sender);
                receiver
            }
        }
    }

    /// 종료 신호가 올 때까지 피드 소비
    ///
    /// 구독/읽기 실패는 그대로 호출자에게 반환되며, 재시도 여부는 호출자가 결정합니다.
    /// 파싱 실패는 경고만 남기고 계속 진행합니다.
    pub async fn run<F>(
        &self,
        engine: &mut VwapComputer,
        feed: &mut F,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ListenSummary, FeedError>
    where
        F: TradeFeed + ?Sized,
    {
        if let Err(e) = feed.subscribe().await {
            log_error("피드 구독", &e);
            return Err(e);
        }

        log_listener_start(engine.window_size(), self.throttle.as_millis());
        let mut summary = ListenSummary::default();

        loop {
            if *shutdown.borrow() {
                log::info!("종료 신호 수신, 피드 해제 중...");
                if let Err(e) = feed.turn_off().await {
                    log_error("피드 해제", &e);
                }
                log_listener_stop(summary.processed, summary.rejected);
                return Ok(summary);
            }

            let trade = match feed.read().await {
                Ok(trade) => trade,
                Err(e) => {
                    log_error("피드 읽기", &e);
                    return Err(e);
                }
            };

            let id = trade.id;
            let symbol = trade.symbol.clone();
            let currency = trade.currency.clone();

            match engine.compute(trade) {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    summary.rejected += 1;
                    log_trade_rejected(id, &symbol, &e);
                }
            }

            let mut snapshot = engine
              .snapshot(&symbol)
              .unwrap_or_else(|| VwapSnapshot::empty(symbol.as_str(), currency.as_str(), current_timestamp_ms()));
            snapshot.currency = currency;

            log::info!("{}", snapshot);
            if let Some(sender) = &self.publisher {
                // 구독자가 없으면 전송 실패는 무시
                let _ = sender.send(snapshot);
            }

            if !self.throttle.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.throttle) => {}
                    Ok(()) = shutdown.changed() => {}
                }
            }
        }
    }

    /// 피드 실패 시 정책에 따라 새 피드로 재연결하며 소비
    ///
    /// 계산기 상태는 연결 사이에 유지됩니다. 반환되는 요약은 마지막 연결의 결과입니다.
    pub async fn run_with_reconnect<F, M>(
        &mut self,
        engine: &mut VwapComputer,
        mut make_feed: M,
        policy: ReconnectPolicy,
        shutdown: watch::Receiver<bool>,
    ) -> Result<ListenSummary, FeedError>
    where
        F: TradeFeed,
        M: FnMut() -> F,
    {
        let mut progress = self.subscribe_snapshots(PROGRESS_BUFFER);
        let mut failures: u32 = 0;

        loop {
            let mut feed = make_feed();

            let e = match self.run(engine, &mut feed, shutdown.clone()).await {
                Ok(summary) => return Ok(summary),
                Err(e) => e,
            };

            // 이번 연결에서 거래를 읽었다면 연속 실패가 아님
            if drain_progress(&mut progress) {
                failures = 0;
            }
            failures += 1;

            if failures > policy.max_attempts {
                log::error!("재연결 한도 초과 ({}회 연속 실패), 종료", failures);
                return Err(e);
            }

            // 읽기 실패 후 소켓 정리 시도
            if !matches!(e, FeedError::Subscribe(_)) {
                if let Err(teardown) = feed.turn_off().await {
                    log_error("피드 해제", &teardown);
                }
            }

            log::warn!(
                "피드 오류, {}ms 후 재연결 ({}/{}): {}",
                policy.delay.as_millis(), failures, policy.max_attempts, e
            );

            if !policy.delay.is_zero() {
                let mut shutdown_wait = shutdown.clone();
                tokio::select! {
                    _ = tokio::time::sleep(policy.delay) => {}
                    Ok(()) = shutdown_wait.changed() => {}
                }
            }
            if *shutdown.borrow() {
                return Ok(ListenSummary::default());
            }
        }
    }
}

/// 버퍼에 쌓인 스냅샷을 비우고, 하나라도 있었는지 반환
fn drain_progress(receiver: &mut broadcast::Receiver<VwapSnapshot>) -> bool {
    let mut progressed = false;
    loop {
        match receiver.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => progressed = true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return progressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::feed::MockTradeFeed;
    use crate::models::trade::Trade;

    fn trade(id: i64, volume: &str) -> Trade {
        Trade::new(id, volume, "100", "BTC-USD", "mock", "USD")
    }

    #[tokio::test]
    async fn test_subscribe_failure_is_returned() {
        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe()
          .times(1)
          .returning(|| Err(FeedError::Subscribe("refused".to_string())));
        feed.expect_read().never();
        feed.expect_turn_off().never();

        let mut engine = VwapComputer::new(5).unwrap();
        let (_tx, rx) = watch::channel(false);
        let result = Listener::new(Duration::ZERO).run(&mut engine, &mut feed, rx).await;

        assert!(matches!(result, Err(FeedError::Subscribe(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_read() {
        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().times(1).returning(|| Ok(()));
        feed.expect_read().never();
        feed.expect_turn_off().times(1).returning(|| Ok(()));

        let mut engine = VwapComputer::new(5).unwrap();
        let (_tx, rx) = watch::channel(true);
        let summary = Listener::new(Duration::ZERO)
          .run(&mut engine, &mut feed, rx)
          .await
          .unwrap();

        assert_eq!(summary, ListenSummary::default());
    }

    #[tokio::test]
    async fn test_cancel_mid_stream_stops_reading() {
        let (tx, rx) = watch::channel(false);
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();

        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().times(1).returning(|| Ok(()));
        feed.expect_read().times(3).returning(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 3 {
                let _ = tx.send(true);
            }
            Ok(trade(n as i64, "1"))
        });
        feed.expect_turn_off().times(1).returning(|| Ok(()));

        let mut engine = VwapComputer::new(5).unwrap();
        let summary = Listener::new(Duration::ZERO)
          .run(&mut engine, &mut feed, rx)
          .await
          .unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(reads.load(Ordering::SeqCst), 3);
        assert_eq!(engine.window_len("BTC-USD"), 3);
    }

    #[tokio::test]
    async fn test_read_failure_is_returned_without_teardown() {
        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().times(1).returning(|| Ok(()));
        feed.expect_read()
          .times(1)
          .returning(|| Err(FeedError::Read("socket reset".to_string())));
        feed.expect_turn_off().never();

        let mut engine = VwapComputer::new(5).unwrap();
        let (_tx, rx) = watch::channel(false);
        let result = Listener::new(Duration::ZERO).run(&mut engine, &mut feed, rx).await;

        assert!(matches!(result, Err(FeedError::Read(_))));
    }

    #[tokio::test]
    async fn test_turn_off_failure_still_clean() {
        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().returning(|| Ok(()));
        feed.expect_turn_off()
          .times(1)
          .returning(|| Err(FeedError::Teardown("already closed".to_string())));

        let mut engine = VwapComputer::new(5).unwrap();
        let (_tx, rx) = watch::channel(true);
        let result = Listener::new(Duration::ZERO).run(&mut engine, &mut feed, rx).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_parse_error_does_not_stop_loop() {
        let (tx, rx) = watch::channel(false);
        let mut pending = vec![trade(3, "2"), trade(2, "0..1"), trade(1, "1")];

        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().returning(|| Ok(()));
        feed.expect_read().times(3).returning(move || {
            let next = pending.pop().ok_or(FeedError::Closed);
            if pending.is_empty() {
                let _ = tx.send(true);
            }
            next
        });
        feed.expect_turn_off().times(1).returning(|| Ok(()));

        let mut engine = VwapComputer::new(5).unwrap();
        let summary = Listener::new(Duration::ZERO)
          .run(&mut engine, &mut feed, rx)
          .await
          .unwrap();

        assert_eq!(summary, ListenSummary { processed: 2, rejected: 1 });
        assert_eq!(engine.sum_volume("BTC-USD"), Some(3.0));
    }

    #[tokio::test]
    async fn test_throttle_cut_short_by_shutdown() {
        let (tx, rx) = watch::channel(false);

        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().returning(|| Ok(()));
        feed.expect_read().times(1).returning(|| Ok(trade(1, "1")));
        feed.expect_turn_off().times(1).returning(|| Ok(()));

        let mut engine = VwapComputer::new(5).unwrap();
        let listener = Listener::new(Duration::from_secs(3600));

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(true);
            tx
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            listener.run(&mut engine, &mut feed, rx),
        )
          .await
          .expect("listener should stop during throttle")
          .unwrap();

        assert_eq!(summary.processed, 1);
        let _ = stopper.await;
    }

    #[tokio::test]
    async fn test_snapshots_are_published() {
        let (tx, rx) = watch::channel(false);

        let mut feed = MockTradeFeed::new();
        feed.expect_subscribe().returning(|| Ok(()));
        feed.expect_read().times(1).returning(move || {
            let _ = tx.send(true);
            Ok(Trade::new(7, "0.5", "3801.13", "ETH-USD", "mock", "USD"))
        });
        feed.expect_turn_off().returning(|| Ok(()));

        let mut engine = VwapComputer::new(5).unwrap();
        let mut listener = Listener::new(Duration::ZERO);
        let mut snapshots = listener.subscribe_snapshots(16);

        listener.run(&mut engine, &mut feed, rx).await.unwrap();

        let snapshot = snapshots.recv().await.unwrap();
        assert_eq!(snapshot.symbol, "ETH-USD");
        assert_eq!(snapshot.occupancy, 1);
        assert_eq!(snapshot.vwap, Some(3801.13));
    }
}
