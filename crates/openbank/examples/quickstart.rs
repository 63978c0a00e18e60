//! Example: list accounts and balances, then print a consent link
//!
//! Usage:
//!   STONE_CLIENT_ID=... STONE_PRIVATE_KEY=./private.pem STONE_SANDBOX=1 \
//!     cargo run -p openbank --example quickstart
//!
//! Set `RUST_LOG=openbank=debug,openbank_auth=debug` to watch token reuse.

use openbank::{Client, ClientConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let client = Client::new(ClientConfig::from_env()?)?;
    client.authenticate().await?;

    let accounts = client.accounts().list().await?;
    println!("{} account(s)", accounts.len());
    for account in &accounts {
        let balance = client.accounts().balance(&account.id).await?;
        println!(
            "  {} / {}  {:>12.2}",
            account.branch_code,
            account.account_code,
            balance.balance as f64 / 100.0
        );
    }

    if client.identity().consent_redirect_url().is_some() {
        let link = client.consent_link(None)?;
        println!("consent session {}: {}", link.session_id, link.url);
    }

    Ok(())
}
