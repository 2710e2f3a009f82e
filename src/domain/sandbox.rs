use crate::domain::correspondent::Country;
use crate::domain::value::Msisdn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Outcome the sandbox simulates for a test number.
pub enum SandboxOutcome {
    Success,
    Failure,
}

/// Sandbox test number for `country`, if the provider documents one.
///
/// Numbers ending in `01` complete, numbers ending in `02` fail. Each number
/// carries an operator prefix known to [`predict`](crate::domain::predict).
pub fn test_msisdn(country: Country, outcome: SandboxOutcome) -> Option<Msisdn> {
    let base = match country {
        Country::Ghana => "2335400000",
        Country::Kenya => "2547000000",
        Country::Uganda => "2567000000",
        Country::Tanzania => "2557540000",
        Country::Rwanda => "2507830000",
        _ => return None,
    };
    let suffix = match outcome {
        SandboxOutcome::Success => "01",
        SandboxOutcome::Failure => "02",
    };
    Msisdn::new(format!("{base}{suffix}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, DepositRequest, Money, predict, resolve_correspondent};

    #[test]
    fn test_numbers_match_documented_values() {
        assert_eq!(
            test_msisdn(Country::Kenya, SandboxOutcome::Success)
                .unwrap()
                .as_str(),
            "254700000001"
        );
        assert_eq!(
            test_msisdn(Country::Ghana, SandboxOutcome::Failure)
                .unwrap()
                .as_str(),
            "233540000002"
        );
        assert!(test_msisdn(Country::Malawi, SandboxOutcome::Success).is_none());
    }

    #[test]
    fn every_test_number_resolves_without_explicit_correspondent() {
        let mut covered = 0;
        for country in Country::ALL {
            for outcome in [SandboxOutcome::Success, SandboxOutcome::Failure] {
                let Some(msisdn) = test_msisdn(country, outcome) else {
                    continue;
                };
                assert_eq!(Country::from_msisdn(&msisdn), Some(country));

                let money = Money::new(Amount::new("10").unwrap(), country.currency());
                let request = DepositRequest::new(money, msisdn.clone());
                let resolved =
                    resolve_correspondent(request.correspondent(), request.payer(), request.money())
                        .unwrap_or_else(|err| panic!("{msisdn}: {err}"));
                assert_eq!(resolved.known(), Some(predict(&msisdn).unwrap()));
                covered += 1;
            }
        }
        assert_eq!(covered, 10);
    }
}
