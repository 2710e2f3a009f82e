use std::io;

use pawapay::{Country, Msisdn, PawaPayClient, predict_correspondent};
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

    let msisdn = Msisdn::new(phone.as_str())?;
    let country = Country::from_msisdn(&msisdn).map(Country::name);
    match predict_correspondent(&phone) {
        Ok(code) => println!("local: {} ({:?}, {})", code.as_str(), country, code.currency()),
        Err(err) => println!("local: {err}"),
    }

    // The remote lookup needs PAWAPAY_API_TOKEN.
    if std::env::var("PAWAPAY_API_TOKEN").is_ok() {
        let client = PawaPayClient::from_env()?;
        match client.predict_correspondent_remote(&msisdn).await? {
            Some(correspondent) => println!("remote: {correspondent}"),
            None => println!("remote: no prediction"),
        }
    }
    Ok(())
}
