//! 테스트 공용 거래 데이터

#![allow(dead_code)]

use xVwap::Trade;

/// 모의 체결 데이터 (마지막 거래는 수량 표기 오류)
pub fn fixture_trades() -> Vec<Trade> {
  let rows: [(i64, &str, &str, &str); 32] = [
    (1, "11.15505557", "3801.13", "ETH-USD"),
    (2, "2.105034", "3801.24", "ETH-USD"),
    (3, "0.02778985", "3801.33", "ETH-USD"),
    (4, "1.11722945", "3801.42", "ETH-USD"),
    (5, "0.50999715", "3801.68", "ETH-USD"),
    (6, "0.001", "46140.63", "BTC-USD"),
    (7, "0.00195483", "46140.63", "BTC-USD"),
    (8, "0.0021002", "46142.19", "BTC-USD"),
    (9, "0.17887", "3802.1", "ETH-USD"),
    (10, "0.001", "46144.06", "BTC-USD"),
    (11, "0.004415", "46144.06", "BTC-USD"),
    (12, "0.0109", "46144.07", "BTC-USD"),
    (13, "0.00368336", "46144.39", "BTC-USD"),
    (14, "0.00677159", "0.08239", "ETH-BTC"),
    (15, "0.5", "3801.59", "ETH-USD"),
    (16, "1.13342666", "3801.61", "ETH-USD"),
    (17, "3", "3801.65", "ETH-USD"),
    (18, "0.38", "3801.68", "ETH-USD"),
    (19, "0.00101725", "3784.03", "ETH-USD"),
    (20, "0.01599", "69889.02", "BTC-USD"),
    (21, "0.01548", "69891.71", "BTC-USD"),
    (22, "0.00117477", "69891.81", "BTC-USD"),
    (23, "0.00131033", "69892.10", "BTC-USD"),
    (24, "0.00050798", "3784.18", "ETH-USD"),
    (25, "0.01323", "69893.38", "BTC-USD"),
    (26, "0.0000143", "69893.38", "BTC-USD"),
    (27, "0.07900209", "3784.36", "ETH-USD"),
    (28, "0.01543728", "69894.11", "BTC-USD"),
    (29, "0.11510333", "3784.39", "ETH-USD"),
    (30, "0.00005285", "3784.39", "ETH-USD"),
    (31, "0.0715337", "69897.48", "BTC-USD"),
    (32, "0..0715337", "69897.48", "BTC-USD"),
  ];

  rows
    .iter()
    .map(|(id, volume, price, symbol)| Trade::new(*id, *volume, *price, *symbol, "mock", "USD"))
    .collect()
}

pub fn trades_for(symbol: &str) -> Vec<Trade> {
  fixture_trades().into_iter().filter(|t| t.symbol == symbol).collect()
}

/// 상대 오차 비교
pub fn assert_close(actual: f64, expected: f64) {
  let tolerance = 1e-9 * expected.abs().max(1.0);
  assert!(
    (actual - expected).abs() <= tolerance,
    "expected {} but got {} (diff {})",
    expected,
    actual,
    (actual - expected).abs()
  );
}
