use serde::{Deserialize, Serialize};

/// 체결 한 건
///
/// 수량과 가격은 피드가 보낸 십진 문자열 그대로 보관합니다.
/// 수치 변환은 엔진이 `compute` 시점에 수행합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub volume: String,
    pub price: String,
    pub symbol: String,
    pub provider: String,
    pub currency: String,
}

impl Trade {
    pub fn new(
        id: i64,
        volume: impl Into<String>,
        price: impl Into<String>,
        symbol: impl Into<String>,
        provider: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Trade {
            id,
            volume: volume.into(),
            price: price.into(),
            symbol: symbol.into(),
            provider: provider.into(),
            currency: currency.into(),
        }
    }
}
