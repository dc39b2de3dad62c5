/// Submit every staged funding transfer as an immediate incoming ACH.
/// Run with: cargo run --bin request_transfers
use anyhow::Result;
use bracketbot::api::broker::TransferRequest;
use bracketbot::api::BrokerClient;
use bracketbot::staging::{JsonStore, TransferRecord};
use bracketbot::BrokerConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "request_transfers")]
struct Cli {
    /// Staging file holding transfer requests
    #[arg(long, default_value = "transfers.json")]
    transfers: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("bracketbot=info")
        .init();

    let cli = Cli::parse();
    let config = BrokerConfig::from_env()?;
    let client = BrokerClient::new(config.broker_url, config.auth_token);

    let transfers = JsonStore::new(&cli.transfers).load::<TransferRecord>()?;
    println!("Submitting {} staged transfers...", transfers.len());

    let mut succeeded = 0usize;

    for (email, record) in &transfers {
        let amount: f64 = match record.amount.parse() {
            Ok(a) => a,
            Err(_) => {
                println!("  ✗ Bad amount {:?} for {}, skipping", record.amount, email);
                continue;
            }
        };

        let request = TransferRequest::incoming_ach(&record.ach_id, amount);
        match client.create_transfer(&record.account_id, &request).await {
            Ok(body) => {
                println!("  ✓ Transfer for {}: ${} -> {}", email, record.amount, body);
                succeeded += 1;
            }
            Err(e) => {
                println!("  ✗ Transfer failed for {}: {:#}", email, e);
                println!("----------------------");
            }
        }
    }

    println!("Done: {}/{} transfers submitted.", succeeded, transfers.len());
    Ok(())
}
