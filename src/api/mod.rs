// Brokerage HTTP clients
pub mod broker;
pub mod market_data;
pub mod trading;

pub use broker::BrokerClient;
pub use market_data::MarketDataClient;
pub use trading::TradingClient;

use reqwest::RequestBuilder;

/// Trading/data API credentials, applied as headers on every request.
#[derive(Debug, Clone)]
pub struct ApiAuth {
    key: String,
    secret: String,
}

impl ApiAuth {
    pub fn new(key: String, secret: String) -> Self {
        Self { key, secret }
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("accept", "application/json")
            .header("APCA-API-KEY-ID", &self.key)
            .header("APCA-API-SECRET-KEY", &self.secret)
    }
}
