use {
    rust_decimal::Decimal,
    serde::{Deserialize, Deserializer, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
    Pending,
    Error,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Error => "ERROR",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Matching is exact: the processor reports upper-case statuses.
impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "COMPLETED" => Self::Completed,
            "PENDING" => Self::Pending,
            "ERROR" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payment as reported by `verify-payment`. Fetched fresh on every check.
///
/// Every field is optional and tolerant of its JSON type: a value of an
/// unexpected type reads as absent instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<PaymentMetadata>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub fee: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub charged_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub invoice_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(skip)]
    raw: serde_json::Value,
}

impl PaymentRecord {
    /// Parses a verify-payment body. Anything other than a non-empty JSON
    /// object yields `None`.
    pub fn from_body(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match &value {
            serde_json::Value::Object(map) if !map.is_empty() => {}
            _ => return None,
        }
        let mut record: Self = match serde_json::from_value(value.clone()) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "verify-payment body has unexpected shape");
                return None;
            }
        };
        record.raw = value;
        Some(record)
    }

    pub fn status(&self) -> Option<PaymentStatus> {
        self.status.as_deref().map(PaymentStatus::from)
    }

    pub fn order_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.order_id.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub full_name: String,
    pub email: String,
    pub metadata: CheckoutMetadata,
    pub redirect_url: String,
    pub cancel_url: String,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutMetadata {
    pub order_id: String,
}

/// Host URLs the payer and the processor are sent back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub redirect_url: String,
    pub cancel_url: String,
    pub webhook_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub payment_url: String,
}

// Strings pass through and numbers are stringified. Anything else is absent.
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(de)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_metadata<'de, D>(de: D) -> Result<Option<PaymentMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(de)? {
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

// Amounts arrive as "100.00" or 100; unparseable values are dropped.
fn lenient_decimal<'de, D>(de: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(de)?.and_then(|s| s.trim().parse().ok()))
}
