use serde::Deserialize;

use crate::call_report::SuccessRule;

/// Default sender for call analysis reports.
pub const DEFAULT_REPORT_FROM: &str = "partner_va@gritppo.com";

/// Default recipient list for call analysis reports.
pub const DEFAULT_REPORT_RECIPIENTS: [&str; 4] = [
    "sofia.etchepare@sidetool.co",
    "evy@gritppo.com",
    "santiago@sidetool.co",
    "eco_pest_control_va@gritppo.com",
];

pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

/// Where partner service rows are written.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct PostgreSQL connection.
    Postgres { database_url: String },
    /// PostgREST-compatible table API (e.g. Supabase).
    Rest { base_url: String, api_key: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
    pub resend_api_key: String,
    pub resend_base_url: String,
    pub report_from: String,
    pub report_recipients: Vec<String>,
    pub success_rule: SuccessRule,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            store: store_from_env()?,
            resend_api_key: std::env::var("RESEND_API_KEY")
                .map_err(|_| anyhow::anyhow!("RESEND_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("RESEND_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            resend_base_url: std::env::var("RESEND_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("RESEND_BASE_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.to_string()),
            report_from: std::env::var("REPORT_FROM")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REPORT_FROM.to_string()),
            report_recipients: std::env::var("REPORT_RECIPIENTS")
                .ok()
                .map(|raw| parse_recipients(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(default_recipients),
            success_rule: std::env::var("CALL_SUCCESS_RULE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|raw| raw.parse::<SuccessRule>().map_err(anyhow::Error::msg))
                .transpose()?
                .unwrap_or_default(),
        };

        // Log successful configuration load (without sensitive values)
        match &config.store {
            StoreConfig::Postgres { database_url } => tracing::debug!(
                "Store: postgres {}...",
                redacted_prefix(database_url)
            ),
            StoreConfig::Rest { base_url, .. } => tracing::debug!("Store: rest {}", base_url),
        }
        tracing::debug!("Resend Base URL: {}", config.resend_base_url);
        tracing::debug!("Report recipients: {:?}", config.report_recipients);
        tracing::debug!("Call success rule: {:?}", config.success_rule);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn store_from_env() -> anyhow::Result<StoreConfig> {
    if let Some(url) = std::env::var("DATABASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
    {
        if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
            anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
        }
        return Ok(StoreConfig::Postgres { database_url: url });
    }

    let base_url = std::env::var("SUPABASE_URL").map_err(|_| {
        anyhow::anyhow!("DATABASE_URL or SUPABASE_URL environment variable required")
    })?;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        anyhow::bail!("SUPABASE_URL must start with http:// or https://");
    }

    let api_key = std::env::var("SUPABASE_ANON_KEY")
        .or_else(|_| std::env::var("SUPABASE_KEY"))
        .map_err(|_| {
            anyhow::anyhow!("SUPABASE_ANON_KEY or SUPABASE_KEY environment variable required")
        })
        .and_then(|key| {
            if key.trim().is_empty() {
                anyhow::bail!("SUPABASE_ANON_KEY cannot be empty");
            }
            Ok(key)
        })?;

    Ok(StoreConfig::Rest { base_url, api_key })
}

/// First 20 characters of a connection string, for debug logs.
fn redacted_prefix(url: &str) -> String {
    url.chars().take(20).collect()
}

/// Splits a comma-separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn default_recipients() -> Vec<String> {
    DEFAULT_REPORT_RECIPIENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
