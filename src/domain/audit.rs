use {
    chrono::{DateTime, Utc},
    serde::Serialize,
    uuid::Uuid,
};

#[derive(Debug, Clone, Serialize)]
pub struct NewAuditEntry {
    pub id: Uuid,
    pub gateway_id: String,
    pub title: String,
    pub detail: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl NewAuditEntry {
    pub fn new(gateway_id: &str, title: &str, detail: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            gateway_id: gateway_id.to_string(),
            title: title.to_string(),
            detail,
            recorded_at: Utc::now(),
        }
    }
}
