//! Correspondents (mobile-money operators) and the static prefix table used to
//! predict them from a phone number.

use std::fmt;

use phonenumber::country;

use crate::domain::validation::ValidationError;
use crate::domain::value::{Currency, Msisdn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Countries served by the known correspondents.
pub enum Country {
    /// Ghana (`+233`).
    Ghana,
    /// Kenya (`+254`).
    Kenya,
    /// Uganda (`+256`).
    Uganda,
    /// Tanzania (`+255`).
    Tanzania,
    /// Rwanda (`+250`).
    Rwanda,
    /// Côte d'Ivoire (`+225`).
    IvoryCoast,
    /// Cameroon (`+237`).
    Cameroon,
    /// Zambia (`+260`).
    Zambia,
    /// Malawi (`+265`).
    Malawi,
}

impl Country {
    /// Every supported country, in declaration order.
    pub const ALL: [Country; 9] = [
        Self::Ghana,
        Self::Kenya,
        Self::Uganda,
        Self::Tanzania,
        Self::Rwanda,
        Self::IvoryCoast,
        Self::Cameroon,
        Self::Zambia,
        Self::Malawi,
    ];

    /// International calling code without `+`.
    pub fn calling_code(self) -> &'static str {
        match self {
            Self::Ghana => "233",
            Self::Kenya => "254",
            Self::Uganda => "256",
            Self::Tanzania => "255",
            Self::Rwanda => "250",
            Self::IvoryCoast => "225",
            Self::Cameroon => "237",
            Self::Zambia => "260",
            Self::Malawi => "265",
        }
    }

    /// ISO 3166-1 alpha-3 code, as used by `/active-conf`.
    pub fn alpha3(self) -> &'static str {
        match self {
            Self::Ghana => "GHA",
            Self::Kenya => "KEN",
            Self::Uganda => "UGA",
            Self::Tanzania => "TZA",
            Self::Rwanda => "RWA",
            Self::IvoryCoast => "CIV",
            Self::Cameroon => "CMR",
            Self::Zambia => "ZMB",
            Self::Malawi => "MWI",
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ghana => "Ghana",
            Self::Kenya => "Kenya",
            Self::Uganda => "Uganda",
            Self::Tanzania => "Tanzania",
            Self::Rwanda => "Rwanda",
            Self::IvoryCoast => "Ivory Coast",
            Self::Cameroon => "Cameroon",
            Self::Zambia => "Zambia",
            Self::Malawi => "Malawi",
        }
    }

    /// Currency that every correspondent in the country settles in.
    pub fn currency(self) -> Currency {
        match self {
            Self::Ghana => Currency::Ghs,
            Self::Kenya => Currency::Kes,
            Self::Uganda => Currency::Ugx,
            Self::Tanzania => Currency::Tzs,
            Self::Rwanda => Currency::Rwf,
            Self::IvoryCoast => Currency::Xof,
            Self::Cameroon => Currency::Xaf,
            Self::Zambia => Currency::Zmw,
            Self::Malawi => Currency::Mwk,
        }
    }

    /// Region id understood by the `phonenumber` crate.
    pub fn region(self) -> country::Id {
        match self {
            Self::Ghana => country::Id::GH,
            Self::Kenya => country::Id::KE,
            Self::Uganda => country::Id::UG,
            Self::Tanzania => country::Id::TZ,
            Self::Rwanda => country::Id::RW,
            Self::IvoryCoast => country::Id::CI,
            Self::Cameroon => country::Id::CM,
            Self::Zambia => country::Id::ZM,
            Self::Malawi => country::Id::MW,
        }
    }

    /// Look up a country by its alpha-3 code (case-insensitive).
    pub fn from_alpha3(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|country| country.alpha3().eq_ignore_ascii_case(code))
    }

    /// Country whose calling code is the longest prefix of `msisdn`.
    pub fn from_msisdn(msisdn: &Msisdn) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|country| msisdn.as_str().starts_with(country.calling_code()))
            .max_by_key(|country| country.calling_code().len())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
/// Correspondents known to this crate.
///
/// Tokens returned by the API that are not listed here are preserved as
/// [`Correspondent`] and return `None` from [`Correspondent::known`].
pub enum CorrespondentCode {
    MtnMomoGha,
    VodafoneGha,
    AirtelTigoGha,
    MpesaKen,
    MtnMomoUga,
    AirtelOapiUga,
    VodacomTza,
    AirtelTza,
    TigoTza,
    HalotelTza,
    MtnMomoRwa,
    AirtelRwa,
    MtnMomoCiv,
    OrangeCiv,
    MtnMomoCmr,
    OrangeCmr,
    MtnMomoZmb,
    AirtelOapiZmb,
    ZamtelZmb,
    AirtelMwi,
    TnmMwi,
}

impl CorrespondentCode {
    /// Every known correspondent, grouped by country.
    pub const ALL: [CorrespondentCode; 21] = [
        Self::MtnMomoGha,
        Self::VodafoneGha,
        Self::AirtelTigoGha,
        Self::MpesaKen,
        Self::MtnMomoUga,
        Self::AirtelOapiUga,
        Self::VodacomTza,
        Self::AirtelTza,
        Self::TigoTza,
        Self::HalotelTza,
        Self::MtnMomoRwa,
        Self::AirtelRwa,
        Self::MtnMomoCiv,
        Self::OrangeCiv,
        Self::MtnMomoCmr,
        Self::OrangeCmr,
        Self::MtnMomoZmb,
        Self::AirtelOapiZmb,
        Self::ZamtelZmb,
        Self::AirtelMwi,
        Self::TnmMwi,
    ];

    /// Wire token, e.g. `MTN_MOMO_GHA`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MtnMomoGha => "MTN_MOMO_GHA",
            Self::VodafoneGha => "VODAFONE_GHA",
            Self::AirtelTigoGha => "AIRTELTIGO_GHA",
            Self::MpesaKen => "MPESA_KEN",
            Self::MtnMomoUga => "MTN_MOMO_UGA",
            Self::AirtelOapiUga => "AIRTEL_OAPI_UGA",
            Self::VodacomTza => "VODACOM_TZA",
            Self::AirtelTza => "AIRTEL_TZA",
            Self::TigoTza => "TIGO_TZA",
            Self::HalotelTza => "HALOTEL_TZA",
            Self::MtnMomoRwa => "MTN_MOMO_RWA",
            Self::AirtelRwa => "AIRTEL_RWA",
            Self::MtnMomoCiv => "MTN_MOMO_CIV",
            Self::OrangeCiv => "ORANGE_CIV",
            Self::MtnMomoCmr => "MTN_MOMO_CMR",
            Self::OrangeCmr => "ORANGE_CMR",
            Self::MtnMomoZmb => "MTN_MOMO_ZMB",
            Self::AirtelOapiZmb => "AIRTEL_OAPI_ZMB",
            Self::ZamtelZmb => "ZAMTEL_ZMB",
            Self::AirtelMwi => "AIRTEL_MWI",
            Self::TnmMwi => "TNM_MWI",
        }
    }

    /// Convert a wire token into a known variant.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == token.trim())
    }

    /// Country the operator serves.
    pub fn country(self) -> Country {
        match self {
            Self::MtnMomoGha | Self::VodafoneGha | Self::AirtelTigoGha => Country::Ghana,
            Self::MpesaKen => Country::Kenya,
            Self::MtnMomoUga | Self::AirtelOapiUga => Country::Uganda,
            Self::VodacomTza | Self::AirtelTza | Self::TigoTza | Self::HalotelTza => {
                Country::Tanzania
            }
            Self::MtnMomoRwa | Self::AirtelRwa => Country::Rwanda,
            Self::MtnMomoCiv | Self::OrangeCiv => Country::IvoryCoast,
            Self::MtnMomoCmr | Self::OrangeCmr => Country::Cameroon,
            Self::MtnMomoZmb | Self::AirtelOapiZmb | Self::ZamtelZmb => Country::Zambia,
            Self::AirtelMwi | Self::TnmMwi => Country::Malawi,
        }
    }

    /// Settlement currency (always the country's currency).
    pub fn currency(self) -> Currency {
        self.country().currency()
    }
}

impl fmt::Display for CorrespondentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Correspondent token as sent to or received from pawaPay.
///
/// Invariant: non-empty after trimming. Unknown tokens are preserved as-is.
pub struct Correspondent(String);

impl Correspondent {
    /// Field name used by pawaPay (`correspondent`).
    pub const FIELD: &'static str = "correspondent";

    /// Create a validated [`Correspondent`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this token to a known correspondent, if one exists.
    pub fn known(&self) -> Option<CorrespondentCode> {
        CorrespondentCode::from_token(&self.0)
    }
}

impl From<CorrespondentCode> for Correspondent {
    fn from(value: CorrespondentCode) -> Self {
        Self(value.as_str().to_owned())
    }
}

impl fmt::Display for Correspondent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `(country, operator prefix after the calling code, correspondent)`.
const PREFIX_TABLE: &[(Country, &str, CorrespondentCode)] = &[
    (Country::Ghana, "24", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "25", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "53", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "54", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "55", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "59", CorrespondentCode::MtnMomoGha),
    (Country::Ghana, "20", CorrespondentCode::VodafoneGha),
    (Country::Ghana, "50", CorrespondentCode::VodafoneGha),
    (Country::Ghana, "26", CorrespondentCode::AirtelTigoGha),
    (Country::Ghana, "27", CorrespondentCode::AirtelTigoGha),
    (Country::Ghana, "56", CorrespondentCode::AirtelTigoGha),
    (Country::Ghana, "57", CorrespondentCode::AirtelTigoGha),
    (Country::Kenya, "70", CorrespondentCode::MpesaKen),
    (Country::Kenya, "71", CorrespondentCode::MpesaKen),
    (Country::Kenya, "72", CorrespondentCode::MpesaKen),
    (Country::Kenya, "74", CorrespondentCode::MpesaKen),
    (Country::Kenya, "757", CorrespondentCode::MpesaKen),
    (Country::Kenya, "758", CorrespondentCode::MpesaKen),
    (Country::Kenya, "759", CorrespondentCode::MpesaKen),
    (Country::Kenya, "768", CorrespondentCode::MpesaKen),
    (Country::Kenya, "769", CorrespondentCode::MpesaKen),
    (Country::Kenya, "79", CorrespondentCode::MpesaKen),
    (Country::Kenya, "110", CorrespondentCode::MpesaKen),
    (Country::Kenya, "111", CorrespondentCode::MpesaKen),
    (Country::Uganda, "76", CorrespondentCode::MtnMomoUga),
    (Country::Uganda, "77", CorrespondentCode::MtnMomoUga),
    (Country::Uganda, "78", CorrespondentCode::MtnMomoUga),
    (Country::Uganda, "39", CorrespondentCode::MtnMomoUga),
    (Country::Uganda, "70", CorrespondentCode::AirtelOapiUga),
    (Country::Uganda, "74", CorrespondentCode::AirtelOapiUga),
    (Country::Uganda, "75", CorrespondentCode::AirtelOapiUga),
    (Country::Uganda, "20", CorrespondentCode::AirtelOapiUga),
    (Country::Tanzania, "74", CorrespondentCode::VodacomTza),
    (Country::Tanzania, "75", CorrespondentCode::VodacomTza),
    (Country::Tanzania, "76", CorrespondentCode::VodacomTza),
    (Country::Tanzania, "68", CorrespondentCode::AirtelTza),
    (Country::Tanzania, "69", CorrespondentCode::AirtelTza),
    (Country::Tanzania, "78", CorrespondentCode::AirtelTza),
    (Country::Tanzania, "65", CorrespondentCode::TigoTza),
    (Country::Tanzania, "67", CorrespondentCode::TigoTza),
    (Country::Tanzania, "71", CorrespondentCode::TigoTza),
    (Country::Tanzania, "77", CorrespondentCode::TigoTza),
    (Country::Tanzania, "61", CorrespondentCode::HalotelTza),
    (Country::Tanzania, "62", CorrespondentCode::HalotelTza),
    (Country::Rwanda, "78", CorrespondentCode::MtnMomoRwa),
    (Country::Rwanda, "79", CorrespondentCode::MtnMomoRwa),
    (Country::Rwanda, "72", CorrespondentCode::AirtelRwa),
    (Country::Rwanda, "73", CorrespondentCode::AirtelRwa),
    (Country::IvoryCoast, "05", CorrespondentCode::MtnMomoCiv),
    (Country::IvoryCoast, "07", CorrespondentCode::OrangeCiv),
    (Country::Cameroon, "67", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "650", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "651", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "652", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "653", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "654", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "680", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "681", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "682", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "683", CorrespondentCode::MtnMomoCmr),
    (Country::Cameroon, "69", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "655", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "656", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "657", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "658", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "659", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "685", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "686", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "687", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "688", CorrespondentCode::OrangeCmr),
    (Country::Cameroon, "689", CorrespondentCode::OrangeCmr),
    (Country::Zambia, "96", CorrespondentCode::MtnMomoZmb),
    (Country::Zambia, "76", CorrespondentCode::MtnMomoZmb),
    (Country::Zambia, "97", CorrespondentCode::AirtelOapiZmb),
    (Country::Zambia, "77", CorrespondentCode::AirtelOapiZmb),
    (Country::Zambia, "95", CorrespondentCode::ZamtelZmb),
    (Country::Zambia, "75", CorrespondentCode::ZamtelZmb),
    (Country::Malawi, "99", CorrespondentCode::AirtelMwi),
    (Country::Malawi, "88", CorrespondentCode::TnmMwi),
];

/// Predict the correspondent serving an already-normalized phone number.
///
/// The longest matching calling code selects the country, then the longest
/// matching operator prefix selects the correspondent.
pub fn predict(msisdn: &Msisdn) -> Result<CorrespondentCode, ValidationError> {
    let unknown = || ValidationError::UnknownCorrespondent {
        msisdn: msisdn.as_str().to_owned(),
    };

    let country = Country::from_msisdn(msisdn).ok_or_else(unknown)?;
    let subscriber = &msisdn.as_str()[country.calling_code().len()..];

    PREFIX_TABLE
        .iter()
        .filter(|(entry_country, prefix, _)| {
            *entry_country == country && subscriber.starts_with(prefix)
        })
        .max_by_key(|(_, prefix, _)| prefix.len())
        .map(|(_, _, code)| *code)
        .ok_or_else(unknown)
}

/// Normalize `input` and predict its correspondent.
///
/// Fails with [`ValidationError::InvalidMsisdn`] for malformed input and
/// [`ValidationError::UnknownCorrespondent`] when no table entry matches.
pub fn predict_correspondent(input: &str) -> Result<CorrespondentCode, ValidationError> {
    predict(&Msisdn::new(input)?)
}
