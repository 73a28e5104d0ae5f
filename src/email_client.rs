use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// One transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Failure reported by the email provider or the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailError(pub String);

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email delivery failed: {}", self.0)
    }
}

impl std::error::Error for EmailError {}

/// Delivery side of the email provider.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// Client for the Resend transactional email API.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ResendClient {
    /// Creates a new `ResendClient`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client.
    /// * `base_url` - API root, e.g. `https://api.resend.com`.
    /// * `api_key` - The API key for bearer authentication.
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let url = format!("{}/emails", self.base_url);
        tracing::debug!(
            "Sending email '{}' to {} recipient(s)",
            email.subject,
            email.to.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(email)
            .send()
            .await
            .map_err(|e| EmailError(format!("Resend request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmailError(format!(
                "Resend returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
