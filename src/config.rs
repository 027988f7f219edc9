use {
    crate::domain::{
        error::GatewayError,
        id::InvoicePublicId,
        money::{ConversionRate, CurrencyCode},
        payment::CheckoutUrls,
    },
    secrecy::{ExposeSecret, SecretString},
    std::{collections::BTreeMap, env},
    url::Url,
};

pub const GATEWAY_ID: &str = "uddokta-pay";

const ENV_PREFIX: &str = "UDDOKTAPAY_";
const CONVERSION_PREFIX: &str = "conversion_";

/// Plugin settings for the UddoktaPay gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    api_url: String,
    api_key: SecretString,
    conversion_rates: BTreeMap<CurrencyCode, ConversionRate>,
    /// Records every request/response pair to the audit sink when set.
    debug: bool,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("conversion_rates", &self.conversion_rates)
            .field("debug", &self.debug)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: SecretString::new(api_key.into()),
            conversion_rates: BTreeMap::new(),
            debug: true,
        }
    }

    pub fn with_rate(mut self, currency: CurrencyCode, rate: ConversionRate) -> Self {
        self.conversion_rates.insert(currency, rate);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builds the config from the host's key/value settings store.
    ///
    /// Recognised keys: `api_url`, `api_key`, `debug` and `conversion_XXX`
    /// where `XXX` is three upper-case letters. Empty conversion values are
    /// treated as unset.
    pub fn from_settings<I, K, V>(settings: I) -> Result<Self, GatewayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new(String::new(), String::new());

        for (key, value) in settings {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                "api_url" => config.api_url = value.to_string(),
                "api_key" => config.api_key = SecretString::new(value.to_string()),
                "debug" => config.debug = parse_flag(value)?,
                _ => {
                    let Some(code) = conversion_currency(key) else {
                        continue;
                    };
                    if value.is_empty() {
                        continue;
                    }
                    let currency = CurrencyCode::new(code)?;
                    config
                        .conversion_rates
                        .insert(currency, ConversionRate::parse(value)?);
                }
            }
        }

        Ok(config)
    }

    /// Reads `UDDOKTAPAY_API_URL`, `UDDOKTAPAY_API_KEY`, `UDDOKTAPAY_DEBUG`
    /// and `UDDOKTAPAY_CONVERSION_XXX`.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_settings(settings_from_env_vars(env::vars()))
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.expose_secret().is_empty()
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.api_url.is_empty() {
            return Err(GatewayError::Config("api_url is required".into()));
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(GatewayError::Config("api_key is required".into()));
        }
        let url = Url::parse(&self.api_url)
            .map_err(|e| GatewayError::Config(format!("api_url is not a valid URL: {e}")))?;
        if url.host_str().is_none() {
            return Err(GatewayError::Config("api_url has no host".into()));
        }
        Ok(())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn rate(&self, currency: &CurrencyCode) -> Option<ConversionRate> {
        self.conversion_rates.get(currency).copied()
    }

    pub fn configured_currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.conversion_rates.keys()
    }
}

fn conversion_currency(key: &str) -> Option<&str> {
    let code = key.strip_prefix(CONVERSION_PREFIX)?;
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())).then_some(code)
}

fn parse_flag(value: &str) -> Result<bool, GatewayError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GatewayError::Config(format!("invalid debug flag: {other}"))),
    }
}

/// Maps `UDDOKTAPAY_*` environment variables onto settings keys.
pub fn settings_from_env_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    vars.into_iter()
        .filter_map(|(name, value)| {
            let name = name.strip_prefix(ENV_PREFIX)?;
            let key = match name {
                "API_URL" => "api_url".to_string(),
                "API_KEY" => "api_key".to_string(),
                "DEBUG" => "debug".to_string(),
                other => {
                    let code = other.strip_prefix("CONVERSION_")?;
                    format!("{CONVERSION_PREFIX}{}", code.to_ascii_uppercase())
                }
            };
            Some((key, value))
        })
        .collect()
}

/// Where the host serves its own pages and callbacks.
#[derive(Debug, Clone)]
pub struct HostConfig {
    public_url: Url,
}

impl HostConfig {
    pub fn new(public_url: &str) -> Result<Self, GatewayError> {
        let public_url = Url::parse(public_url)
            .map_err(|e| GatewayError::Config(format!("APP_PUBLIC_URL is not a valid URL: {e}")))?;
        Ok(Self { public_url })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        let public_url = env::var("APP_PUBLIC_URL")
            .map_err(|_| GatewayError::Config("APP_PUBLIC_URL must be set".into()))?;
        Self::new(&public_url)
    }

    pub fn checkout_urls(&self, invoice: &InvoicePublicId) -> CheckoutUrls {
        CheckoutUrls {
            redirect_url: self.page_url("thanks", Some(invoice)),
            cancel_url: self.page_url("cancel", Some(invoice)),
            webhook_url: self.page_url(&format!("payment/{GATEWAY_ID}/ipn"), None),
        }
    }

    fn page_url(&self, path: &str, invoice: Option<&InvoicePublicId>) -> String {
        let base = self.public_url.as_str().trim_end_matches('/');
        let mut url = match Url::parse(&format!("{base}/{path}")) {
            Ok(url) => url,
            Err(_) => self.public_url.clone(),
        };
        if let Some(id) = invoice {
            url.query_pairs_mut().append_pair("id", id.as_str());
        }
        url.into()
    }
}
