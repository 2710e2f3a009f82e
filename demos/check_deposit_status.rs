use std::io;

use pawapay::{DepositId, PawaPayClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let deposit_id = std::env::var("PAWAPAY_DEPOSIT_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "PAWAPAY_DEPOSIT_ID environment variable is required",
        )
    })?;

    let client = PawaPayClient::from_env()?;
    let response = client
        .check_deposit_status(DepositId::parse(&deposit_id)?)
        .await?;

    println!(
        "status: {}, final: {}, amount: {} {}, payer: {}, failure: {:?}",
        response.status,
        response.status.is_final(),
        response.amount,
        response.currency,
        response.payer,
        response.failure_reason
    );
    Ok(())
}
