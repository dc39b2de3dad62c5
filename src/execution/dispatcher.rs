use crate::api::{ApiAuth, MarketDataClient, TradingClient};
use crate::config::Config;
use crate::error::{DispatchError, OrderError};
use crate::models::{BracketPrices, OrderRequest, Ratio, Side};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Per-ratio outcome: the brokerage's raw confirmation body, or that ratio's
/// error. One ratio's failure never invalidates another's.
#[derive(Debug)]
pub struct DispatchResult {
    pub ratio: Ratio,
    pub outcome: Result<String, OrderError>,
}

/// Bracket-order dispatcher
///
/// Fetches one reference price per call, derives a stop-loss/take-profit pair
/// per ratio, and submits one bracket order per ratio concurrently through a
/// bounded worker pool.
pub struct Dispatcher {
    market_data: MarketDataClient,
    trading: TradingClient,
    max_in_flight: usize,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        let auth = ApiAuth::new(config.api_key.clone(), config.api_secret.clone());
        Self {
            market_data: MarketDataClient::new(config.data_url.clone(), auth.clone()),
            trading: TradingClient::new(config.trading_url.clone(), auth),
            max_in_flight: config.max_in_flight.max(1),
        }
    }

    /// Dispatch with an explicitly chosen direction.
    ///
    /// The quote fetch is the single shared point of failure: if it errors,
    /// the whole dispatch aborts before any order is built. Everything after
    /// it is isolated per ratio, and the returned results line up with the
    /// input ratios regardless of worker completion order.
    pub async fn dispatch(
        &self,
        symbol: &str,
        side: Side,
        ratios: &[Ratio],
        qty: u32,
    ) -> Result<Vec<DispatchResult>, DispatchError> {
        let price = self.market_data.latest_trade_price(symbol).await?;

        tracing::info!(
            symbol,
            %side,
            price,
            ratios = ratios.len(),
            "dispatching bracket orders"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut handles = Vec::with_capacity(ratios.len());

        for &ratio in ratios {
            let semaphore = semaphore.clone();
            let trading = self.trading.clone();
            let symbol = symbol.to_string();

            handles.push(tokio::spawn(async move {
                // Holds a pool slot for the lifetime of the submission
                let _permit = semaphore.acquire_owned().await.ok();
                submit_one(&trading, &symbol, side, ratio, qty, price).await
            }));
        }

        // Join-all: no early exit on failure, no per-worker timeout
        let mut results = Vec::with_capacity(handles.len());
        for (&ratio, handle) in ratios.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(OrderError::Join(e.to_string())),
            };
            results.push(DispatchResult { ratio, outcome });
        }

        Ok(results)
    }

    /// Dispatch with a uniformly random direction (the source strategy's
    /// placeholder for a real signal).
    pub async fn dispatch_random<R: rand::Rng>(
        &self,
        symbol: &str,
        ratios: &[Ratio],
        qty: u32,
        rng: &mut R,
    ) -> Result<Vec<DispatchResult>, DispatchError> {
        let side = Side::random(rng);
        self.dispatch(symbol, side, ratios, qty).await
    }
}

async fn submit_one(
    trading: &TradingClient,
    symbol: &str,
    side: Side,
    ratio: Ratio,
    qty: u32,
    price: f64,
) -> Result<String, OrderError> {
    let prices = bracket_prices(price, side, &ratio)?;

    tracing::info!(
        symbol,
        %side,
        entry = price,
        stop_loss = prices.stop_loss,
        take_profit = prices.take_profit,
        "submitting bracket order"
    );

    let order = OrderRequest::market_bracket(symbol, side, qty, &prices);
    trading.submit_order(&order).await
}

/// Derive the exit prices for one ratio.
///
/// Distances are `price * ratio`; a buy puts the take-profit above and the
/// stop-loss below the entry, a sell inverts both. Prices are rounded to
/// cents, and a price that rounds to exactly 0.00 is a validation failure
/// rather than a silent clamp.
pub fn bracket_prices(price: f64, side: Side, ratio: &Ratio) -> Result<BracketPrices, OrderError> {
    let take_profit_distance = price * ratio.take_profit;
    let stop_loss_distance = price * ratio.stop_loss;

    let (take_profit, stop_loss) = match side {
        Side::Buy => (
            round_to_cents(price + take_profit_distance),
            round_to_cents(price - stop_loss_distance),
        ),
        Side::Sell => (
            round_to_cents(price - take_profit_distance),
            round_to_cents(price + stop_loss_distance),
        ),
    };

    if take_profit == 0.0 || stop_loss == 0.0 {
        return Err(OrderError::ZeroBracketPrice {
            side,
            take_profit,
            stop_loss,
        });
    }

    Ok(BracketPrices {
        take_profit,
        stop_loss,
    })
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
