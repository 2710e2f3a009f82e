use std::io::{self, Read};

use pawapay::{CallbackSecret, CallbackVerifier, SIGNATURE_HEADER};
use tracing_subscriber::EnvFilter;

/// Reads a callback body from stdin and checks it against `PAWAPAY_SIGNATURE`.
///
/// Without a signature, prints the one pawaPay would send for the body.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secret = std::env::var("PAWAPAY_CALLBACK_SECRET").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "PAWAPAY_CALLBACK_SECRET environment variable is required",
        )
    })?;
    let verifier = CallbackVerifier::new(CallbackSecret::new(secret)?);

    let mut payload = Vec::new();
    io::stdin().read_to_end(&mut payload)?;

    let Ok(signature) = std::env::var("PAWAPAY_SIGNATURE") else {
        println!("{SIGNATURE_HEADER}: {}", verifier.sign(&payload));
        return Ok(());
    };

    let notification = verifier.verify_and_parse(&payload, &signature)?;
    println!(
        "{:?} {} is {} (amount: {:?} {:?})",
        notification.kind,
        notification.id,
        notification.status,
        notification.amount,
        notification.currency
    );
    Ok(())
}
