use {
    super::error::GatewayError,
    derive_more::Display,
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
};

/// ISO-4217 style three-letter code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// The processor settles in Bangladeshi taka.
    pub const SETTLEMENT: &'static str = "BDT";

    pub fn new(code: impl AsRef<str>) -> Result<Self, GatewayError> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GatewayError::Validation(format!(
                "currency code must be three letters, got: {code}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn bdt() -> Self {
        Self(Self::SETTLEMENT.to_string())
    }

    pub fn is_settlement(&self) -> bool {
        self.0 == Self::SETTLEMENT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = GatewayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Multiplier from an invoice currency into BDT. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub struct ConversionRate(Decimal);

impl ConversionRate {
    pub fn new(rate: Decimal) -> Result<Self, GatewayError> {
        if rate <= Decimal::ZERO {
            return Err(GatewayError::Config(format!(
                "conversion rate must be positive, got: {rate}"
            )));
        }
        Ok(Self(rate))
    }

    pub fn identity() -> Self {
        Self(Decimal::ONE)
    }

    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let rate: Decimal = raw
            .trim()
            .parse()
            .map_err(|e| GatewayError::Config(format!("invalid conversion rate {raw:?}: {e}")))?;
        Self::new(rate)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `amount * rate`, or a validation error when the product does not fit
    /// in a `Decimal`.
    pub fn apply(&self, amount: Decimal) -> Result<Decimal, GatewayError> {
        amount.checked_mul(self.0).ok_or_else(|| {
            GatewayError::Validation(format!(
                "converting {amount} at rate {} overflows",
                self.0
            ))
        })
    }
}
