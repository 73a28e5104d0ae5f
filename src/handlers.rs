use crate::config::{Config, StoreConfig};
use crate::db::Database;
use crate::db_storage::{PartnerServiceStore, PgPartnerServiceStore};
use crate::email_client::{EmailSender, ResendClient};
use crate::errors::AppError;
use crate::ingestion;
use crate::models::{IngestRequest, MessageResponse};
use crate::rest_storage::RestPartnerServiceStore;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Built once before the server starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// HTTP client used to fetch partner documents.
    pub http_client: reqwest::Client,
    /// Destination for partner service rows.
    pub store: Arc<dyn PartnerServiceStore>,
    /// Transactional email delivery.
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    /// Connects the configured store and email client.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::new();

        let store: Arc<dyn PartnerServiceStore> = match &config.store {
            StoreConfig::Postgres { database_url } => {
                let db = Database::new(database_url).await?;
                tracing::info!("Database connection pool established");
                Arc::new(PgPartnerServiceStore::new(db.pool))
            }
            StoreConfig::Rest { base_url, api_key } => {
                tracing::info!("Using table API at {}", base_url);
                Arc::new(RestPartnerServiceStore::new(
                    http_client.clone(),
                    base_url.clone(),
                    api_key.clone(),
                ))
            }
        };

        let mailer: Arc<dyn EmailSender> = Arc::new(ResendClient::new(
            http_client.clone(),
            config.resend_base_url.clone(),
            config.resend_api_key.clone(),
        ));

        Ok(Self {
            config,
            http_client,
            store,
            mailer,
        })
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/call
///
/// Echoes the request body back as JSON. A body that is not JSON comes back
/// as a JSON string; an empty body as `null`.
pub async fn echo(body: Bytes) -> Json<Value> {
    let payload = echo_payload(&body);
    tracing::debug!("Received: {}", payload);
    Json(payload)
}

fn echo_payload(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Plain-text 404 for methods the echo endpoint does not serve.
pub async fn not_found(method: Method) -> (StatusCode, &'static str) {
    tracing::debug!("No handler for method {}", method);
    (StatusCode::NOT_FOUND, "Not Found")
}

/// JSON 405 for methods the ingestion endpoint does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// POST /api/updateData
///
/// Fetches the partner document at `url` and writes one row per service.
///
/// # Returns
///
/// * `Result<Json<MessageResponse>, AppError>` - 200 once every service row
///   is written; 400 without a usable `url`; 500 for any fetch, decode,
///   validation or insert failure.
pub async fn update_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let request: IngestRequest = serde_json::from_slice(&body).unwrap_or_default();
    let url = request
        .source_url()
        .ok_or_else(|| AppError::BadRequest("Missing 'url' in request body.".to_string()))?;

    let document = ingestion::fetch_document(&state.http_client, url).await?;
    ingestion::insert_document(state.store.as_ref(), &document).await?;

    Ok(Json(MessageResponse {
        message: "Data inserted successfully".to_string(),
    }))
}
