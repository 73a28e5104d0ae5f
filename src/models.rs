use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Table that receives one row per partner service.
pub const PARTNER_SERVICES_TABLE: &str = "partner_services";

/// Body of `POST /api/updateData`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    /// Location of the partner document. Kept loose so a non-string value
    /// reads as "missing" instead of a deserialization failure.
    #[serde(default)]
    pub url: Option<Value>,
}

impl IngestRequest {
    /// Returns the source URL when it is a non-empty string.
    pub fn source_url(&self) -> Option<&str> {
        self.url
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Success body for the ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// One persisted row: partner-level contact fields plus one service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerServiceRow {
    pub partner_id: String,
    pub name: Option<String>,
    /// Partner addresses joined with `"; "`.
    pub address: String,
    pub number: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub service_name: String,
    pub service_enabled: Option<bool>,
    /// Pricing blocks with info chart markup stripped.
    pub pricing_info: Value,
    /// Protocol schedule with timeframe markup stripped.
    pub protocol_info: Value,
}
