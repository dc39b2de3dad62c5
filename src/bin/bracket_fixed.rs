/// Fixed-ratio bracket dispatch: one bracket order per default reward:risk
/// multiple, with the reciprocal driving the stop-loss leg.
/// Run with: cargo run --bin bracket_fixed
use anyhow::Result;
use bracketbot::execution::{generate_symmetric_ratios, Dispatcher, DEFAULT_MULTIPLES};
use bracketbot::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("bracketbot=info")
        .init();

    let config = Config::from_env()?;
    let dispatcher = Dispatcher::new(&config);
    let ratios = generate_symmetric_ratios(&DEFAULT_MULTIPLES);

    println!("-------------------------");
    println!("Dispatching {} fixed-ratio brackets for {}...", ratios.len(), config.symbol);
    println!("-------------------------");

    let results = dispatcher
        .dispatch_random(&config.symbol, &ratios, config.qty, &mut rand::thread_rng())
        .await?;

    for result in &results {
        println!("-------------------------");
        match &result.outcome {
            Ok(body) => println!(
                "Order response for {} ({:.2}:{:.2}): {}",
                config.symbol, result.ratio.take_profit, result.ratio.stop_loss, body
            ),
            Err(e) => println!(
                "Order failed for {} ({:.2}:{:.2}): {}",
                config.symbol, result.ratio.take_profit, result.ratio.stop_loss, e
            ),
        }
    }

    println!("-------------------------");
    println!("Trading completed.");
    Ok(())
}
