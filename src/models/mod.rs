use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Pick a direction uniformly at random.
    ///
    /// This is a deliberate randomized-strategy placeholder, not a signal
    /// derived from market data. The rng is injected so tests can pin it.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A take-profit/stop-loss multiplier pair, relative to the reference price.
/// Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Derived exit prices, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketPrices {
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Wire payload for a bracket order: market entry with an attached
/// one-cancels-other stop-loss/take-profit pair.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
    pub symbol: String,
    pub qty: String,
    pub stop_loss: StopLossLeg,
    pub take_profit: TakeProfitLeg,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopLossLeg {
    pub stop_price: String,
    // Recommended by the brokerage for stop-limit handling; same price as the stop.
    pub limit_price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakeProfitLeg {
    pub limit_price: String,
}

impl OrderRequest {
    /// Build a market bracket order for the given derived prices.
    pub fn market_bracket(symbol: &str, side: Side, qty: u32, prices: &BracketPrices) -> Self {
        let stop_loss_price = format_price(prices.stop_loss);
        Self {
            side,
            order_type: "market".to_string(),
            time_in_force: "day".to_string(),
            symbol: symbol.to_string(),
            qty: qty.to_string(),
            stop_loss: StopLossLeg {
                stop_price: stop_loss_price.clone(),
                limit_price: stop_loss_price,
            },
            take_profit: TakeProfitLeg {
                limit_price: format_price(prices.take_profit),
            },
        }
    }
}

/// Format a cent-rounded price for the wire (the API takes prices as strings).
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}
