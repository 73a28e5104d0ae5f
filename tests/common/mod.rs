//! Shared fixtures for router-level tests: in-memory store and mailer fakes
//! plus a one-shot request helper.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use partner_webhooks_api::call_report::SuccessRule;
use partner_webhooks_api::config::{default_recipients, Config, StoreConfig, DEFAULT_REPORT_FROM};
use partner_webhooks_api::db_storage::{PartnerServiceStore, StoreError};
use partner_webhooks_api::email_client::{EmailError, EmailSender, OutgoingEmail};
use partner_webhooks_api::handlers::AppState;
use partner_webhooks_api::models::PartnerServiceRow;
use partner_webhooks_api::router::create_router;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Store that keeps rows in memory and can be told to reject one insert.
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<Vec<PartnerServiceRow>>,
    attempts: Mutex<usize>,
    /// Zero-based insert attempt that fails, with the message to report.
    fail_at: Option<(usize, String)>,
}

impl RecordingStore {
    pub fn failing_at(index: usize, message: &str) -> Self {
        Self {
            fail_at: Some((index, message.to_string())),
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<PartnerServiceRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl PartnerServiceStore for RecordingStore {
    async fn insert_partner_service(&self, row: &PartnerServiceRow) -> Result<(), StoreError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };

        if let Some((index, message)) = &self.fail_at {
            if *index == attempt {
                return Err(StoreError::new(message.clone()));
            }
        }

        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// Mailer that records every email and optionally fails delivery.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(EmailError("provider unavailable".to_string()));
        }
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        store: StoreConfig::Rest {
            base_url: "http://localhost:54321".to_string(),
            api_key: "test_key".to_string(),
        },
        resend_api_key: "re_test".to_string(),
        resend_base_url: "http://localhost:9".to_string(),
        report_from: DEFAULT_REPORT_FROM.to_string(),
        report_recipients: default_recipients(),
        success_rule: SuccessRule::ExplicitFlag,
    }
}

pub fn test_state(
    config: Config,
    store: Arc<RecordingStore>,
    mailer: Arc<RecordingMailer>,
) -> Arc<AppState> {
    Arc::new(AppState {
        config,
        http_client: reqwest::Client::new(),
        store,
        mailer,
    })
}

/// Sends one request through a fresh router and returns status and body.
pub async fn send(
    state: Arc<AppState>,
    method: &str,
    uri: &str,
    body: impl Into<Body>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("build request");

    let response = create_router(state)
        .oneshot(request)
        .await
        .expect("execute request");

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");

    (status, body.to_vec())
}

pub fn json_body(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("parse response json")
}
