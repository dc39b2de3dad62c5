/// Check each staged account's balance and stage a funding transfer for any
/// account under the target. Staged transfers are submitted separately by
/// `request_transfers`.
/// Run with: cargo run --bin fund_accounts
use anyhow::Result;
use bracketbot::api::BrokerClient;
use bracketbot::staging::{AccountRecord, JsonStore, TransferRecord};
use bracketbot::BrokerConfig;
use chrono::Utc;
use clap::Parser;
use std::collections::BTreeMap;

const FUNDING_TARGET: f64 = 45_000.0;

#[derive(Parser)]
#[command(name = "fund_accounts")]
struct Cli {
    /// Staging file holding created accounts
    #[arg(long, default_value = "accounts.json")]
    accounts: String,

    /// Staging file for transfer requests
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

    let accounts = JsonStore::new(&cli.accounts).load::<AccountRecord>()?;
    let transfer_store = JsonStore::new(&cli.transfers);
    let mut transfers: BTreeMap<String, TransferRecord> = BTreeMap::new();

    for (email, record) in &accounts {
        let ach_id = match &record.ach_id {
            Some(id) => id.clone(),
            None => {
                println!("  - {} has no ACH relationship, skipping", email);
                continue;
            }
        };

        match client.trading_account(&record.account_id).await {
            Ok(account) => {
                let balance = account.balance_value();
                if balance < FUNDING_TARGET {
                    let amount = FUNDING_TARGET - balance;
                    println!(
                        "Account {} ({}) has ${:.2}. Requesting ${:.2}.",
                        email, record.account_id, balance, amount
                    );
                    transfers.insert(
                        email.clone(),
                        TransferRecord {
                            account_id: record.account_id.clone(),
                            email: email.clone(),
                            ach_id,
                            amount: format!("{:.2}", amount),
                            requested_at: Utc::now(),
                        },
                    );
                } else {
                    println!(
                        "Account {} ({}) has sufficient funds: ${:.2}.",
                        email, record.account_id, balance
                    );
                }
            }
            Err(e) => {
                println!("  ✗ Failed to fetch balance for {}: {:#}", email, e);
            }
        }
    }

    transfer_store.save(&transfers)?;
    println!(
        "Staged {} transfer requests to {}.",
        transfers.len(),
        transfer_store.path().display()
    );
    Ok(())
}
