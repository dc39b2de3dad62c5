/// Create one sandbox brokerage account per paired ratio, with the ratio
/// baked into the account email, and stage the results for the other
/// maintenance binaries.
/// Run with: cargo run --bin create_accounts
use anyhow::Result;
use bracketbot::api::broker::AccountApplication;
use bracketbot::api::BrokerClient;
use bracketbot::execution::generate_paired_ratios;
use bracketbot::staging::{AccountRecord, JsonStore};
use bracketbot::BrokerConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "create_accounts")]
struct Cli {
    /// Staging file for created accounts
    #[arg(long, default_value = "accounts.json")]
    store: String,

    /// Largest ratio numerator/denominator to enumerate
    #[arg(long, default_value_t = 6)]
    max_ratio: u32,
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

    let store = JsonStore::new(&cli.store);
    let mut records = store.load_or_default::<AccountRecord>()?;

    let ratios = generate_paired_ratios(cli.max_ratio);
    println!("Creating {} sandbox accounts...", ratios.len());

    let mut created = 0usize;

    for ratio in &ratios {
        let email = format!("{:.2}-{:.2}@example.com", ratio.take_profit, ratio.stop_loss);

        if records.contains_key(&email) {
            println!("  - {} already staged, skipping", email);
            continue;
        }

        let application = AccountApplication::sandbox(&email);
        match client.create_account(&application).await {
            Ok(account) => {
                println!(
                    "  ✓ Created account {} for {} ({})",
                    account.id,
                    email,
                    account.status.as_deref().unwrap_or("unknown")
                );
                records.insert(
                    email.clone(),
                    AccountRecord {
                        account_id: account.id,
                        email,
                        ach_id: None,
                    },
                );
                created += 1;
            }
            Err(e) => {
                println!("  ✗ Failed to create account for {}: {:#}", email, e);
            }
        }
    }

    store.save(&records)?;
    println!("Done: {} created, {} staged total.", created, records.len());
    Ok(())
}
