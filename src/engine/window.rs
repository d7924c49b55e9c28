/**
* filename : window
* author : HAMA
* date: 2025. 6. 2.
* description: 심볼별 고정 크기 거래 윈도우와 누적 합계
**/

use std::collections::VecDeque;

use crate::models::trade::Trade;

/// 윈도우에 보관되는 거래 한 건
///
/// 파싱된 수량/가격을 함께 보관하여 퇴출 시 다시 파싱하지 않습니다.
#[derive(Debug, Clone)]
pub struct WindowEntry {
  pub trade: Trade,
  pub volume: f64,
  pub price: f64,
}

/// 심볼 하나의 윈도우 상태
#[derive(Debug, Clone)]
pub struct SymbolWindow {
  entries: VecDeque<WindowEntry>,
  sum_volume: f64,
  price_times_volume: f64,
  vwap: Option<f64>,
}

impl SymbolWindow {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    SymbolWindow {
      entries: VecDeque::with_capacity(capacity),
      sum_volume: 0.0,
      price_times_volume: 0.0,
      vwap: None,
    }
  }

  /// 새 거래 반영
  ///
  /// 윈도우가 가득 차 있으면 가장 오래된 거래를 먼저 빼고 새 거래를 더합니다.
  /// 합계는 매번 증분으로만 갱신합니다 (윈도우 전체 재계산 없음).
  /// 가격×수량 누적은 융합 곱셈-덧셈(`mul_add`)으로 한 번만 반올림합니다.
  pub(crate) fn push(&mut self, entry: WindowEntry, window_size: usize) {
    if self.entries.len() >= window_size {
      if let Some(oldest) = self.entries.pop_front() {
        self.sum_volume -= oldest.volume;
        self.price_times_volume = (-oldest.price).mul_add(oldest.volume, self.price_times_volume);
      }
    }

    self.sum_volume += entry.volume;
    self.price_times_volume = entry.price.mul_add(entry.volume, self.price_times_volume);
    self.entries.push_back(entry);

    // 정확히 0일 때만 None (누적 오차로 남은 극소값은 그대로 나눔)
    self.vwap = if self.sum_volume != 0.0 {
      Some(self.price_times_volume / self.sum_volume)
    } else {
      None
    };
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn sum_volume(&self) -> f64 {
    self.sum_volume
  }

  pub fn price_times_volume(&self) -> f64 {
    self.price_times_volume
  }

  /// 거래량 합이 0이면 `None`
  pub fn vwap(&self) -> Option<f64> {
    self.vwap
  }

  /// 오래된 순서로 순회
  pub fn entries(&self) -> impl Iterator<Item = &WindowEntry> {
    self.entries.iter()
  }

  pub fn trades(&self) -> impl Iterator<Item = &Trade> {
    self.entries.iter().map(|entry| &entry.trade)
  }

  /// 가장 최근 거래
  pub fn latest(&self) -> Option<&Trade> {
    self.entries.back().map(|entry| &entry.trade)
  }
}
