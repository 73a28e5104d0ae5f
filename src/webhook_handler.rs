use crate::call_report::{CallReport, REPORT_SUBJECT};
use crate::email_client::OutgoingEmail;
use crate::handlers::AppState;
use crate::webhook_models::{CallWebhookPayload, CALL_ANALYZED_EVENT};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
};
use std::sync::Arc;

/// Call analytics webhook handler.
///
/// Receives call lifecycle events from the voice agent platform. Only
/// `call_analyzed` produces a report email; every other event is logged and
/// acknowledged. The response is `200 Webhook processed` whether or not the
/// email goes out.
pub async fn call_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    tracing::info!("Incoming request with method: POST");
    tracing::debug!("Received payload: {}", String::from_utf8_lossy(&body));

    let payload = CallWebhookPayload::from_body(&body);

    match payload.event_name() {
        Some(CALL_ANALYZED_EVENT) => {
            tracing::info!("Processing '{}' event", CALL_ANALYZED_EVENT);
            send_call_report(&state, &payload).await;
        }
        other => tracing::info!("Unhandled event type: {:?}", other),
    }

    (StatusCode::OK, "Webhook processed")
}

/// Plain-text 404 for anything but POST.
pub async fn invalid_method(method: Method) -> (StatusCode, &'static str) {
    tracing::info!("Invalid request method: {}", method);
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Builds the report email for one analyzed call.
pub fn build_report_email(state: &AppState, payload: &CallWebhookPayload) -> OutgoingEmail {
    let report = CallReport::from_payload(payload);

    OutgoingEmail {
        from: state.config.report_from.clone(),
        to: state.config.report_recipients.clone(),
        subject: REPORT_SUBJECT.to_string(),
        html: report.render_html(state.config.success_rule),
    }
}

/// Renders and sends the report. Delivery failures are logged, never
/// returned.
async fn send_call_report(state: &AppState, payload: &CallWebhookPayload) {
    let email = build_report_email(state, payload);

    match state.mailer.send(&email).await {
        Ok(()) => tracing::info!("Email sent successfully"),
        Err(e) => tracing::error!("Error sending email: {}", e),
    }
}
