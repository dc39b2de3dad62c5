use super::ApiAuth;
use crate::error::OrderError;
use crate::models::OrderRequest;
use reqwest::Client;

/// Client for the trading API (order submission, bulk cancel/close)
#[derive(Clone)]
pub struct TradingClient {
    client: Client,
    base_url: String,
    auth: ApiAuth,
}

impl TradingClient {
    /// `base_url` is the versioned API root, e.g. `https://paper-api.alpaca.markets/v2`.
    pub fn new(base_url: String, auth: ApiAuth) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth,
        }
    }

    /// Submit a bracket order
    /// Endpoint: POST /orders
    ///
    /// On 2xx the confirmation body is returned verbatim, not parsed further.
    /// On non-2xx the rejection body rides along in the error.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<String, OrderError> {
        let url = format!("{}/orders", self.base_url);

        let response = self
            .auth
            .apply(self.client.post(&url))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OrderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Cancel all open orders
    /// Endpoint: DELETE /orders
    pub async fn cancel_all_orders(&self) -> Result<String, OrderError> {
        self.delete("orders").await
    }

    /// Close all open positions
    /// Endpoint: DELETE /positions
    pub async fn close_all_positions(&self) -> Result<String, OrderError> {
        self.delete("positions").await
    }

    async fn delete(&self, path: &str) -> Result<String, OrderError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.auth.apply(self.client.delete(&url)).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OrderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
