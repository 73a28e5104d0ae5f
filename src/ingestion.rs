//! Partner document ingestion.
//!
//! Turns a fetched partner document into one [`PartnerServiceRow`] per
//! service entry, stripping markup from the free-text pricing and protocol
//! fields, and writes the rows one at a time.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::db_storage::PartnerServiceStore;
use crate::errors::AppError;
use crate::models::PartnerServiceRow;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields (_id, overview, services).";
pub const MISSING_SERVICE_NAME: &str = "Missing service name in one of the services.";
pub const SERVICES_NOT_A_LIST: &str = "'services' must be a list.";

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Removes every `<...>` run and trims surrounding whitespace.
pub fn strip_html(html: &str) -> String {
    tag_regex().replace_all(html, "").trim().to_string()
}

/// Presence check with JavaScript semantics: `null`, `false`, `0` and `""`
/// count as absent.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text column value: strings verbatim, `null`/absent as `None`, anything
/// else as its JSON text.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn strip_if_string(value: &mut Value) {
    if let Value::String(s) = value {
        *s = strip_html(s);
    }
}

/// Strips markup from `infoChart[].title` and `infoChart[].content`.
///
/// Every other field of a pricing block is preserved verbatim. A missing or
/// non-list `pricing` yields an empty list.
pub fn sanitize_pricing(pricing: Option<&Value>) -> Value {
    let blocks = match pricing {
        Some(Value::Array(blocks)) => blocks,
        None | Some(Value::Null) => return Value::Array(Vec::new()),
        Some(other) => {
            tracing::warn!("Dropping pricing that is not a list: {}", other);
            return Value::Array(Vec::new());
        }
    };

    let cleaned = blocks
        .iter()
        .cloned()
        .map(|mut block| {
            if let Some(Value::Array(chart)) = block.get_mut("infoChart") {
                for entry in chart.iter_mut().filter_map(Value::as_object_mut) {
                    if let Some(title) = entry.get_mut("title") {
                        strip_if_string(title);
                    }
                    if let Some(content) = entry.get_mut("content") {
                        strip_if_string(content);
                    }
                }
            }
            block
        })
        .collect();

    Value::Array(cleaned)
}

/// Returns `protocols.schedule` (or `{}` when it is absent or falsy) with
/// `timeframes[].content` stripped of markup. A schedule that is not an
/// object is kept as-is.
pub fn sanitize_protocol(protocols: Option<&Value>) -> Value {
    let schedule = protocols.and_then(|p| p.get("schedule"));
    if !is_truthy(schedule) {
        return Value::Object(Map::new());
    }
    let mut schedule = schedule.cloned().unwrap_or_default();

    if let Some(Value::Array(timeframes)) = schedule.get_mut("timeframes") {
        for frame in timeframes.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(content) = frame.get_mut("content") {
                strip_if_string(content);
            }
        }
    }

    schedule
}

/// Partner-level fields shared by every row of one document.
#[derive(Debug, Clone, PartialEq)]
struct PartnerFields {
    partner_id: String,
    name: Option<String>,
    address: String,
    number: Option<String>,
    website: Option<String>,
    email: Option<String>,
}

impl PartnerFields {
    fn from_document(id: &Value, overview: &Value) -> Self {
        let address = match overview.get("addresses") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            _ => String::new(),
        };

        Self {
            partner_id: text_field(Some(id)).unwrap_or_default(),
            name: text_field(overview.get("name")),
            address,
            number: text_field(overview.get("number")),
            website: text_field(overview.get("website")),
            email: text_field(overview.get("email")),
        }
    }

    fn with_service(&self, service: &Value) -> Result<PartnerServiceRow, AppError> {
        let options = service.get("options");
        let service_name = options.and_then(|o| o.get("name"));
        if !is_truthy(service_name) {
            return Err(AppError::Validation(MISSING_SERVICE_NAME.to_string()));
        }

        Ok(PartnerServiceRow {
            partner_id: self.partner_id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            number: self.number.clone(),
            website: self.website.clone(),
            email: self.email.clone(),
            service_name: text_field(service_name).unwrap_or_default(),
            service_enabled: options
                .and_then(|o| o.get("enabled"))
                .and_then(Value::as_bool),
            pricing_info: sanitize_pricing(service.get("pricing")),
            protocol_info: sanitize_protocol(service.get("protocols")),
        })
    }
}

/// Checks the top-level shape of a partner document and returns its
/// partner fields and service entries.
fn split_document(document: &Value) -> Result<(PartnerFields, &[Value]), AppError> {
    let id = document.get("_id");
    let overview = document.get("overview");
    let services = document.get("services");

    let (Some(id), Some(overview), Some(services)) = (id, overview, services) else {
        return Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    };
    if !is_truthy(Some(id)) || !is_truthy(Some(overview)) || !is_truthy(Some(services)) {
        return Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()));
    }

    let services = services
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| AppError::Validation(SERVICES_NOT_A_LIST.to_string()))?;

    Ok((PartnerFields::from_document(id, overview), services))
}

/// Builds every row of a document without touching the store.
///
/// Stops at the first service entry without a name.
pub fn build_rows(document: &Value) -> Result<Vec<PartnerServiceRow>, AppError> {
    let (partner, services) = split_document(document)?;
    services
        .iter()
        .map(|service| partner.with_service(service))
        .collect()
}

/// Downloads the partner document at `url` and decodes it as JSON.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Value, AppError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| AppError::Fetch(format!("invalid URL '{}': {}", url, e)))?;

    tracing::info!("Fetching partner document from {}", parsed);

    let response = client.get(parsed).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::Fetch(format!(
            "{} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AppError::InvalidJson(e.to_string()))
}

/// Inserts one row per service entry, in order.
///
/// Not atomic: each entry is validated and inserted before the next one is
/// looked at, so a failure part-way leaves earlier rows committed.
///
/// # Returns
///
/// * `Result<usize, AppError>` - Number of rows inserted.
pub async fn insert_document(
    store: &dyn PartnerServiceStore,
    document: &Value,
) -> Result<usize, AppError> {
    let (partner, services) = split_document(document)?;

    let mut inserted = 0;
    for service in services {
        let row = partner.with_service(service)?;
        store.insert_partner_service(&row).await?;
        inserted += 1;
    }

    tracing::info!(
        "Inserted {} service row(s) for partner {}",
        inserted,
        partner.partner_id
    );
    Ok(inserted)
}
