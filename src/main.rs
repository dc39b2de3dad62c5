use anyhow::Result;
use bracketbot::api::{ApiAuth, TradingClient};
use bracketbot::execution::{generate_paired_ratios, Dispatcher};
use bracketbot::Config;
use clap::Parser;

/// Bracket-order trading utility
#[derive(Parser)]
#[command(name = "bracketbot")]
struct Cli {
    /// 0 = dispatch bracket orders, 1 = cancel all orders, 2 = close all positions
    mode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Dispatch,
    CancelOrders,
    ClosePositions,
}

/// Non-integer input and out-of-range integers both fall through to the
/// usage text; neither performs any action.
fn parse_mode(arg: &str) -> Option<Mode> {
    match arg.trim().parse::<i64>() {
        Ok(0) => Some(Mode::Dispatch),
        Ok(1) => Some(Mode::CancelOrders),
        Ok(2) => Some(Mode::ClosePositions),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match parse_mode(&cli.mode) {
        Some(Mode::Dispatch) => run_dispatch(&config).await?,
        Some(Mode::CancelOrders) => cancel_all_orders(&config).await?,
        Some(Mode::ClosePositions) => close_all_positions(&config).await?,
        None => {
            tracing::warn!("invalid mode {:?}", cli.mode);
            print_usage();
        }
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bracketbot=info".into()),
        )
        .init();
}

fn print_usage() {
    println!("Usage: bracketbot <mode>");
    println!("Modes:");
    println!("  0 - Dispatch bracket orders (paired-ratio mode, random direction)");
    println!("  1 - Cancel all open orders");
    println!("  2 - Close all open positions");
}

async fn run_dispatch(config: &Config) -> Result<()> {
    let dispatcher = Dispatcher::new(config);
    let ratios = generate_paired_ratios(config.max_ratio);

    tracing::info!(
        symbol = %config.symbol,
        ratios = ratios.len(),
        qty = config.qty,
        "running bracket-order dispatch"
    );

    let results = dispatcher
        .dispatch_random(&config.symbol, &ratios, config.qty, &mut rand::thread_rng())
        .await?;

    let mut submitted = 0usize;
    let mut failed = 0usize;

    for result in &results {
        match &result.outcome {
            Ok(body) => {
                submitted += 1;
                tracing::info!(
                    take_profit = result.ratio.take_profit,
                    stop_loss = result.ratio.stop_loss,
                    response = %body,
                    "order accepted"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(
                    take_profit = result.ratio.take_profit,
                    stop_loss = result.ratio.stop_loss,
                    "order failed: {}",
                    e
                );
            }
        }
    }

    tracing::info!(submitted, failed, "trading completed");
    Ok(())
}

async fn cancel_all_orders(config: &Config) -> Result<()> {
    let client = trading_client(config);
    let body = client.cancel_all_orders().await?;
    tracing::info!(response = %body, "orders canceled");
    Ok(())
}

async fn close_all_positions(config: &Config) -> Result<()> {
    let client = trading_client(config);
    let body = client.close_all_positions().await?;
    tracing::info!(response = %body, "positions closed");
    Ok(())
}

fn trading_client(config: &Config) -> TradingClient {
    let auth = ApiAuth::new(config.api_key.clone(), config.api_secret.clone());
    TradingClient::new(config.trading_url.clone(), auth)
}
