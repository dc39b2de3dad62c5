/// Create an ACH relationship for every staged account that does not have
/// one yet, and stage the relationship ids for the funding binaries.
/// Run with: cargo run --bin link_ach
use anyhow::Result;
use bracketbot::api::broker::AchRelationshipRequest;
use bracketbot::api::BrokerClient;
use bracketbot::staging::{AccountRecord, JsonStore};
use bracketbot::BrokerConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "link_ach")]
struct Cli {
    /// Staging file holding created accounts
    #[arg(long, default_value = "accounts.json")]
    store: String,

    /// Owner name on the sandbox bank account
    #[arg(long, default_value = "Kind Archimedes")]
    owner: String,
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
    let mut records = store.load::<AccountRecord>()?;

    let request = AchRelationshipRequest::sandbox_checking(&cli.owner);
    let mut linked = 0usize;

    for record in records.values_mut() {
        if record.ach_id.is_some() {
            println!("  - {} already linked, skipping", record.email);
            continue;
        }

        println!("Processing account {}", record.account_id);
        match client
            .create_ach_relationship(&record.account_id, &request)
            .await
        {
            Ok(relationship) => {
                println!(
                    "  ✓ Linked {} -> {} ({})",
                    record.email,
                    relationship.id,
                    relationship.status.as_deref().unwrap_or("unknown")
                );
                record.ach_id = Some(relationship.id);
                linked += 1;
            }
            Err(e) => {
                println!("  ✗ Failed to link {}: {:#}", record.email, e);
            }
        }
    }

    store.save(&records)?;
    println!("Done: {} relationships created.", linked);
    Ok(())
}
