//! Caller-owned client configuration, built explicitly or from `PAWAPAY_*` variables.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::domain::{ApiToken, CallbackSecret};

pub const ENV_API_TOKEN: &str = "PAWAPAY_API_TOKEN";
pub const ENV_ENVIRONMENT: &str = "PAWAPAY_ENVIRONMENT";
pub const ENV_BASE_URL: &str = "PAWAPAY_BASE_URL";
pub const ENV_CALLBACK_URL: &str = "PAWAPAY_CALLBACK_URL";
pub const ENV_CALLBACK_SECRET: &str = "PAWAPAY_CALLBACK_SECRET";
pub const ENV_ENABLE_SIGNED_REQUESTS: &str = "PAWAPAY_ENABLE_SIGNED_REQUESTS";
pub const ENV_PRIVATE_KEY_PATH: &str = "PAWAPAY_PRIVATE_KEY_PATH";
pub const ENV_PUBLIC_KEY_PATH: &str = "PAWAPAY_PUBLIC_KEY_PATH";
pub const ENV_TIMEOUT: &str = "PAWAPAY_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "PAWAPAY_MAX_RETRIES";

const SANDBOX_BASE_URL: &str = "https://api.sandbox.pawapay.io";
const PRODUCTION_BASE_URL: &str = "https://api.pawapay.io";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PAWAPAY_API_TOKEN is required")]
    MissingApiToken,

    #[error("environment must be 'sandbox' or 'production', got {value:?}")]
    InvalidEnvironment { value: String },

    #[error("{var} is not a valid URL: {value:?}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} is not a valid non-negative integer: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("a private key path is required when signed requests are enabled")]
    MissingPrivateKeyPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Parse `sandbox` or `production` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_owned(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

#[derive(Debug, Clone)]
/// Settings for [`crate::PawaPayClient`].
///
/// Construct with [`PawaPayConfig::new`] and adjust the public fields, or load
/// everything from the environment with [`PawaPayConfig::from_env`].
pub struct PawaPayConfig {
    pub api_token: ApiToken,
    pub environment: Environment,
    /// Overrides the environment's default base URL.
    pub base_url: Option<Url>,
    pub callback_url: Option<Url>,
    pub callback_secret: Option<CallbackSecret>,
    /// Adds a `Content-Digest` header to every request with a body.
    pub enable_signed_requests: bool,
    pub private_key_path: Option<PathBuf>,
    pub public_key_path: Option<PathBuf>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl PawaPayConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new(api_token: ApiToken, environment: Environment) -> Self {
        Self {
            api_token,
            environment,
            base_url: None,
            callback_url: None,
            callback_secret: None,
            enable_signed_requests: false,
            private_key_path: None,
            public_key_path: None,
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_callback_url(mut self, callback_url: Url) -> Self {
        self.callback_url = Some(callback_url);
        self
    }

    pub fn with_callback_secret(mut self, secret: CallbackSecret) -> Self {
        self.callback_secret = Some(secret);
        self
    }

    /// Enable signed requests using the key at `private_key_path`.
    pub fn with_signed_requests(mut self, private_key_path: impl Into<PathBuf>) -> Self {
        self.enable_signed_requests = true;
        self.private_key_path = Some(private_key_path.into());
        self
    }

    pub fn with_public_key_path(mut self, public_key_path: impl Into<PathBuf>) -> Self {
        self.public_key_path = Some(public_key_path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Load from process environment variables (see the `ENV_*` constants).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_token = get(ENV_API_TOKEN)
            .and_then(|value| ApiToken::new(value).ok())
            .ok_or(ConfigError::MissingApiToken)?;

        let environment = match get(ENV_ENVIRONMENT) {
            Some(value) => Environment::parse(&value)?,
            None => Environment::default(),
        };

        let mut config = Self::new(api_token, environment);
        config.base_url = get(ENV_BASE_URL)
            .map(|value| parse_url(ENV_BASE_URL, value))
            .transpose()?;
        config.callback_url = get(ENV_CALLBACK_URL)
            .map(|value| parse_url(ENV_CALLBACK_URL, value))
            .transpose()?;
        config.callback_secret =
            get(ENV_CALLBACK_SECRET).and_then(|value| CallbackSecret::new(value).ok());
        config.enable_signed_requests = get(ENV_ENABLE_SIGNED_REQUESTS)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
        config.private_key_path = get(ENV_PRIVATE_KEY_PATH).map(PathBuf::from);
        config.public_key_path = get(ENV_PUBLIC_KEY_PATH).map(PathBuf::from);
        if let Some(value) = get(ENV_TIMEOUT) {
            config.timeout = Duration::from_secs(parse_number(ENV_TIMEOUT, value)?);
        }
        if let Some(value) = get(ENV_MAX_RETRIES) {
            let retries = parse_number(ENV_MAX_RETRIES, value.clone())?;
            config.max_retries = u32::try_from(retries).map_err(|_| ConfigError::InvalidNumber {
                var: ENV_MAX_RETRIES,
                value,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_signed_requests && self.private_key_path.is_none() {
            return Err(ConfigError::MissingPrivateKeyPath);
        }
        Ok(())
    }

    /// Base URL without a trailing slash; request paths are appended to it.
    pub fn base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.as_str().trim_end_matches('/'),
            None => self.environment.default_base_url(),
        }
    }
}

fn parse_url(var: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl { var, value })
}

fn parse_number(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}
