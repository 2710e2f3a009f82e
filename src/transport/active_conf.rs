use serde::Deserialize;

use super::wire::{TransportError, parse_correspondent};
use crate::domain::{ActiveConfiguration, CorrespondentInfo, CountryConfiguration};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveConfJson {
    #[serde(default)]
    merchant_id: Option<String>,
    #[serde(default)]
    merchant_name: Option<String>,
    #[serde(default)]
    countries: Vec<CountryJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct CountryJson {
    country: String,
    #[serde(default)]
    correspondents: Vec<CorrespondentJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorrespondentJson {
    correspondent: String,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    operation_types: Vec<OperationTypeJson>,
}

/// Operation types are either bare names or objects carrying `operationType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OperationTypeJson {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Detailed { operation_type: String },
}

impl OperationTypeJson {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) => name,
            Self::Detailed { operation_type } => operation_type,
        }
    }
}

pub fn decode_active_conf(json: &str) -> Result<ActiveConfiguration, TransportError> {
    let parsed: ActiveConfJson = serde_json::from_str(json)?;

    let countries = parsed
        .countries
        .into_iter()
        .map(|country| {
            let correspondents = country
                .correspondents
                .into_iter()
                .map(|entry| {
                    Ok(CorrespondentInfo {
                        correspondent: parse_correspondent(entry.correspondent)?,
                        country: country.country.clone(),
                        currency: entry.currency,
                        operation_types: entry
                            .operation_types
                            .into_iter()
                            .map(OperationTypeJson::into_name)
                            .collect(),
                    })
                })
                .collect::<Result<Vec<_>, TransportError>>()?;
            Ok(CountryConfiguration {
                country: country.country,
                correspondents,
            })
        })
        .collect::<Result<Vec<_>, TransportError>>()?;

    Ok(ActiveConfiguration {
        merchant_id: parsed.merchant_id,
        merchant_name: parsed.merchant_name,
        countries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CorrespondentCode, Country};

    #[test]
    fn decode_active_conf_copies_country_into_correspondents() {
        let json = r#"
        {
          "merchantId": "1",
          "merchantName": "Demo",
          "countries": [
            {
              "country": "GHA",
              "correspondents": [
                {"correspondent": "MTN_MOMO_GHA", "currency": "GHS", "operationTypes": ["DEPOSIT", "PAYOUT"]},
                {"correspondent": "VODAFONE_GHA", "currency": "GHS", "operationTypes": [{"operationType": "DEPOSIT", "minTransactionLimit": "1"}]}
              ]
            },
            {"country": "KEN", "correspondents": [{"correspondent": "MPESA_KEN", "currency": "KES"}]}
          ]
        }
        "#;
        let conf = decode_active_conf(json).unwrap();
        assert_eq!(conf.merchant_name.as_deref(), Some("Demo"));

        let all = conf.correspondents();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].country, "GHA");
        assert_eq!(all[0].operation_types, vec!["DEPOSIT", "PAYOUT"]);
        assert_eq!(all[1].operation_types, vec!["DEPOSIT"]);

        let kenya = conf.correspondents_for(Country::Kenya);
        assert_eq!(kenya[0].correspondent.known(), Some(CorrespondentCode::MpesaKen));
        assert_eq!(kenya[0].currency, "KES");
    }

    #[test]
    fn decode_active_conf_tolerates_missing_countries() {
        let conf = decode_active_conf("{}").unwrap();
        assert!(conf.countries.is_empty());
    }
}
