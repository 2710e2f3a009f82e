use serde::{Deserialize, Serialize};

use super::wire::TransportError;
use crate::domain::{Correspondent, Msisdn};

#[derive(Debug, Serialize)]
struct PredictBody<'a> {
    msisdn: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct PredictJson {
    #[serde(default)]
    correspondent: Option<String>,
}

pub fn encode_predict_body(msisdn: &Msisdn) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&PredictBody {
        msisdn: msisdn.as_str(),
    })?)
}

/// `None` when the response carries no (or an empty) correspondent.
pub fn decode_predict_response(json: &str) -> Result<Option<Correspondent>, TransportError> {
    let parsed: PredictJson = serde_json::from_str(json)?;
    Ok(parsed
        .correspondent
        .and_then(|value| Correspondent::new(value).ok()))
}
