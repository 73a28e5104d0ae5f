use async_trait::async_trait;
use serde_json::Value;

use crate::db_storage::{PartnerServiceStore, StoreError};
use crate::models::{PartnerServiceRow, PARTNER_SERVICES_TABLE};

/// Store that writes through a PostgREST-style table API (Supabase).
#[derive(Clone)]
pub struct RestPartnerServiceStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestPartnerServiceStore {
    /// Creates a new `RestPartnerServiceStore`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client.
    /// * `base_url` - Project URL, without the `/rest/v1` suffix.
    /// * `api_key` - Key sent as both `apikey` and bearer token.
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, PARTNER_SERVICES_TABLE)
    }
}

#[async_trait]
impl PartnerServiceStore for RestPartnerServiceStore {
    async fn insert_partner_service(&self, row: &PartnerServiceRow) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await
            .map_err(|e| StoreError::new(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Table API returned {}: {}", status, error_text);
            return Err(StoreError::new(extract_message(&error_text)));
        }

        tracing::debug!(
            "Inserted partner service row: partner_id={}, service={}",
            row.partner_id,
            row.service_name
        );
        Ok(())
    }
}

/// PostgREST errors are `{"message": ..., "code": ...}`; anything else is
/// reported as-is.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
