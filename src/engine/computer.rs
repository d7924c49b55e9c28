//! 심볼별 슬라이딩 윈도우 VWAP 계산기
//!
//! 심볼마다 최근 N건의 거래만 유지하며, 거래 한 건당 O(1)로 VWAP을 갱신합니다.
//! 계산기는 단일 작성자를 전제로 하며 내부 잠금이 없습니다 (`compute`는 `&mut self`).

use std::collections::HashMap;

use crate::error::{ParseError, TradeField, VwapError};
use crate::engine::window::{SymbolWindow, WindowEntry};
use crate::models::snapshot::VwapSnapshot;
use crate::models::trade::Trade;
use crate::utils::current_timestamp_ms;
use crate::utils::decimal::parse_decimal;

/// VWAP 계산기
#[derive(Debug, Clone)]
pub struct VwapComputer {
    /// 심볼 -> 윈도우 상태 (첫 유효 거래 시 생성)
    windows: HashMap<String, SymbolWindow>,
    /// 모든 심볼에 공통인 윈도우 크기
    window_size: usize,
}

impl VwapComputer {
    /// 새 계산기 생성
    ///
    /// 윈도우 크기가 0이면 `InvalidParameter`를 반환합니다.
    pub fn new(window_size: usize) -> Result<Self, VwapError> {
        if window_size == 0 {
            return Err(VwapError::InvalidParameter(
                "window size must be greater than zero".to_string(),
            ));
        }

        Ok(VwapComputer {
            windows: HashMap::new(),
            window_size,
        })
    }

    /// 거래 한 건 반영 후 해당 심볼의 VWAP 반환
    ///
    /// 수량이나 가격이 십진 표기가 아니면 어떤 상태도 바꾸지 않고 `ParseError`를 반환합니다.
    pub fn compute(&mut self, trade: Trade) -> Result<Option<f64>, ParseError> {
        let volume = parse_decimal(TradeField::Volume, &trade.volume)?;
        let price = parse_decimal(TradeField::Price, &trade.price)?;

        let window_size = self.window_size;
        let window = self
          .windows
          .entry(trade.symbol.clone())
          .or_insert_with(|| SymbolWindow::with_capacity(window_size));

        window.push(WindowEntry { trade, volume, price }, window_size);

        Ok(window.vwap())
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// 심볼의 현재 VWAP (거래가 없거나 거래량 합이 0이면 `None`)
    pub fn vwap(&self, symbol: &str) -> Option<f64> {
        self.windows.get(symbol).and_then(SymbolWindow::vwap)
    }

    /// 심볼 윈도우에 들어있는 거래 수
    pub fn window_len(&self, symbol: &str) -> usize {
        self.windows.get(symbol).map_or(0, SymbolWindow::len)
    }

    pub fn sum_volume(&self, symbol: &str) -> Option<f64> {
        self.windows.get(symbol).map(SymbolWindow::sum_volume)
    }

    pub fn price_times_volume(&self, symbol: &str) -> Option<f64> {
        self.windows.get(symbol).map(SymbolWindow::price_times_volume)
    }

    /// 심볼의 윈도우 상태
    pub fn window(&self, symbol: &str) -> Option<&SymbolWindow> {
        self.windows.get(symbol)
    }

    /// 상태가 생성된 심볼 목록
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    /// 심볼의 현재 상태 스냅샷
    ///
    /// 통화는 윈도우의 가장 최근 거래에서 가져옵니다.
    pub fn snapshot(&self, symbol: &str) -> Option<VwapSnapshot> {
        let window = self.windows.get(symbol)?;
        let currency = window.latest().map(|t| t.currency.clone()).unwrap_or_default();

        Some(VwapSnapshot {
            symbol: symbol.to_string(),
            occupancy: window.len(),
            currency,
            vwap: window.vwap(),
            sum_volume: window.sum_volume(),
            price_times_volume: window.price_times_volume(),
            timestamp: current_timestamp_ms(),
        })
    }
}
