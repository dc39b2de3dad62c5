use super::ApiAuth;
use crate::error::QuoteError;
use reqwest::Client;
use serde::Deserialize;

/// Client for the market data API (latest trade lookups)
#[derive(Clone)]
pub struct MarketDataClient {
    client: Client,
    base_url: String,
    auth: ApiAuth,
}

#[derive(Debug, Deserialize)]
struct LatestTradeResponse {
    trade: TradeTick,
}

#[derive(Debug, Deserialize)]
struct TradeTick {
    p: f64,
}

impl MarketDataClient {
    /// `base_url` is the versioned API root, e.g. `https://data.alpaca.markets/v2`.
    pub fn new(base_url: String, auth: ApiAuth) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth,
        }
    }

    /// Get the latest trade price for a symbol
    /// Endpoint: GET /stocks/{symbol}/trades/latest
    ///
    /// A snapshot, not a stream: fetched once per dispatch and every derived
    /// bracket price depends on it.
    pub async fn latest_trade_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let url = format!("{}/stocks/{}/trades/latest", self.base_url, symbol);

        let response = self.auth.apply(self.client.get(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body: LatestTradeResponse = response.json().await?;

        tracing::debug!(symbol, price = body.trade.p, "fetched latest trade");

        Ok(body.trade.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String) -> MarketDataClient {
        MarketDataClient::new(base_url, ApiAuth::new("key".into(), "secret".into()))
    }

    #[tokio::test]
    async fn test_latest_trade_price() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stocks/NDAQ/trades/latest")
            .match_header("APCA-API-KEY-ID", "key")
            .match_header("APCA-API-SECRET-KEY", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"NDAQ","trade":{"p":78.43,"s":100,"t":"2024-12-06T21:00:00Z"}}"#)
            .create_async()
            .await;

        let price = test_client(server.url())
            .latest_trade_price("NDAQ")
            .await
            .unwrap();

        assert!((price - 78.43).abs() < 1e-9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_latest_trade_price_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stocks/NDAQ/trades/latest")
            .with_status(503)
            .create_async()
            .await;

        let err = test_client(server.url())
            .latest_trade_price("NDAQ")
            .await
            .unwrap_err();

        assert!(matches!(err, QuoteError::Status(503)));
    }

    #[tokio::test]
    async fn test_latest_trade_price_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stocks/NDAQ/trades/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"NDAQ"}"#)
            .create_async()
            .await;

        let err = test_client(server.url())
            .latest_trade_price("NDAQ")
            .await
            .unwrap_err();

        assert!(matches!(err, QuoteError::Transport(_)));
    }
}
