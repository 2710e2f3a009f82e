use std::io;

use pawapay::{DepositRequest, Money, Msisdn, PawaPayClient, StatementDescription};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let phone = std::env::var("PAWAPAY_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "PAWAPAY_PHONE environment variable is required",
        )
    })?;
    let amount = std::env::var("PAWAPAY_AMOUNT").unwrap_or_else(|_| "100".to_owned());
    let currency = std::env::var("PAWAPAY_CURRENCY").unwrap_or_else(|_| "KES".to_owned());

    let client = PawaPayClient::from_env()?;
    let request = DepositRequest::new(Money::parse(&amount, &currency)?, Msisdn::new(phone)?)
        .with_statement_description(StatementDescription::new("Demo deposit")?);
    let response = client.request_deposit(request).await?;

    println!(
        "deposit_id: {}, status: {}, correspondent: {}, amount: {} {}",
        response.deposit_id,
        response.status,
        response.correspondent,
        response.amount,
        response.currency
    );
    Ok(())
}
