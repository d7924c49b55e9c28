use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream};

use crate::error::FeedError;
use crate::feed::TradeFeed;
use crate::models::trade::Trade;

pub const COINBASE_WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";
const PROVIDER_NAME: &str = "coinbase";
const MATCHES_CHANNEL: &str = "matches";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Coinbase `matches` 채널 기반 거래 피드
pub struct CoinbaseFeed {
    url: String,
    product_ids: Vec<String>,
    stream: Option<WsStream>,
}

#[derive(Debug, Serialize)]
struct SubscriptionRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    product_ids: &'a [String],
    channels: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CoinbaseMessage {
    Match(MatchMessage),
    LastMatch(MatchMessage),
    Error {
        message: String,
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MatchMessage {
    trade_id: i64,
    product_id: String,
    size: String,
    price: String,
}

impl CoinbaseFeed {
    pub fn new(url: impl Into<String>, product_ids: Vec<String>) -> Self {
        CoinbaseFeed {
            url: url.into(),
            product_ids,
            stream: None,
        }
    }

    fn request(&self, kind: &'static str) -> Result<Message, FeedError> {
        let request = SubscriptionRequest {
            kind,
            product_ids: &self.product_ids,
            channels: [MATCHES_CHANNEL],
        };
        Ok(Message::Text(serde_json::to_string(&request)?))
    }
}

#[async_trait]
impl TradeFeed for CoinbaseFeed {
    async fn subscribe(&mut self) -> Result<(), FeedError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let (mut stream, _) = connect_async(self.url.as_str())
          .await
          .map_err(|e| FeedError::Subscribe(format!("connect to {} failed: {}", self.url, e)))?;

        stream
          .send(self.request("subscribe")?)
          .await
          .map_err(|e| FeedError::Subscribe(e.to_string()))?;

        log::info!("Coinbase 구독 완료: {}", self.product_ids.join(","));
        self.stream = Some(stream);
        Ok(())
    }

    async fn read(&mut self) -> Result<Trade, FeedError> {
        let stream = self.stream.as_mut().ok_or(FeedError::NotSubscribed)?;

        loop {
            let message = match stream.next().await {
                Some(message) => message?,
                None => return Err(FeedError::Closed),
            };

            match message {
                Message::Text(text) => {
                    if let Some(trade) = parse_message(&text)? {
                        return Ok(trade);
                    }
                }
                Message::Close(_) => return Err(FeedError::Closed),
                // ping/pong은 tungstenite가 처리
                _ => {}
            }
        }
    }

    async fn turn_off(&mut self) -> Result<(), FeedError> {
        let unsubscribe = self.request("unsubscribe")?;

        if let Some(mut stream) = self.stream.take() {
            stream
              .send(unsubscribe)
              .await
              .map_err(|e| FeedError::Teardown(e.to_string()))?;
            stream
              .close(None)
              .await
              .map_err(|e| FeedError::Teardown(e.to_string()))?;
        }

        Ok(())
    }
}

/// 텍스트 메시지를 거래로 변환 (거래가 아닌 메시지는 `None`)
fn parse_message(text: &str) -> Result<Option<Trade>, FeedError> {
    match serde_json::from_str::<CoinbaseMessage>(text)? {
        CoinbaseMessage::Match(m) | CoinbaseMessage::LastMatch(m) => {
            let currency = m.product_id.split('-').nth(1).unwrap_or_default().to_string();
            Ok(Some(Trade {
                id: m.trade_id,
                volume: m.size,
                price: m.price,
                symbol: m.product_id,
                provider: PROVIDER_NAME.to_string(),
                currency,
            }))
        }
        CoinbaseMessage::Error { message, reason } => Err(FeedError::Read(match reason {
            Some(reason) => format!("{}: {}", message, reason),
            None => message,
        })),
        CoinbaseMessage::Other => Ok(None),
    }
}
