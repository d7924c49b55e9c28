use std::fmt;

use serde::Serialize;

/// 거래 한 건 처리 직후의 심볼별 VWAP 상태
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VwapSnapshot {
    pub symbol: String,
    /// 현재 윈도우에 들어있는 거래 수
    pub occupancy: usize,
    pub currency: String,
    /// 윈도우 거래량 합이 0이면 `None`
    pub vwap: Option<f64>,
    pub sum_volume: f64,
    pub price_times_volume: f64,
    /// 생성 시각 (밀리초)
    pub timestamp: i64,
}

impl VwapSnapshot {
    /// 아직 상태가 없는 심볼용 빈 스냅샷
    pub fn empty(symbol: impl Into<String>, currency: impl Into<String>, timestamp: i64) -> Self {
        VwapSnapshot {
            symbol: symbol.into(),
            occupancy: 0,
            currency: currency.into(),
            vwap: None,
            sum_volume: 0.0,
            price_times_volume: 0.0,
            timestamp,
        }
    }
}

impl fmt::Display for VwapSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vwap {
            Some(vwap) => write!(
                f,
                "Symbol: {} Trade Sum:{:3} VWAP: {} {:.2}",
                self.symbol, self.occupancy, self.currency, vwap
            ),
            None => write!(
                f,
                "Symbol: {} Trade Sum:{:3} VWAP: {} n/a",
                self.symbol, self.occupancy, self.currency
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(vwap: Option<f64>) -> VwapSnapshot {
        VwapSnapshot {
            symbol: "BTC-USD".to_string(),
            occupancy: 7,
            currency: "USD".to_string(),
            vwap,
            sum_volume: 0.5,
            price_times_volume: 33078.85,
            timestamp: 0,
        }
    }

    #[test]
    fn test_display_two_decimals() {
        let line = snapshot(Some(66157.70506683017)).to_string();
        assert_eq!(line, "Symbol: BTC-USD Trade Sum:  7 VWAP: USD 66157.71");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = VwapSnapshot::empty("ETH-BTC", "BTC", 1);
        assert_eq!(snapshot.occupancy, 0);
        assert_eq!(snapshot.to_string(), "Symbol: ETH-BTC Trade Sum:  0 VWAP: BTC n/a");
    }

    #[test]
    fn test_display_undefined_vwap() {
        let line = snapshot(None).to_string();
        assert!(line.ends_with("VWAP: USD n/a"));
    }
}
