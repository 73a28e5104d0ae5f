//! Call analysis report: flattens a call webhook payload into display
//! fields and renders the HTML email body.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::webhook_models::{CallAnalysis, CallWebhookPayload, CustomAnalysisData};

/// Placeholder for any field the payload does not carry.
pub const NOT_AVAILABLE: &str = "N/A";
pub const CAMPAIGN_NAME: &str = "Eco Pest Control";
pub const REPORT_SUBJECT: &str = "Call Analysis Report for Eco Pest Control";

/// How the "Call Successful" line is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessRule {
    /// Successful when `call_status` is `"ended"`.
    CallStatus,
    /// Successful when the analysis block says `call_successful: true`.
    #[default]
    ExplicitFlag,
}

impl FromStr for SuccessRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call_status" | "status" => Ok(SuccessRule::CallStatus),
            "call_successful" | "explicit_flag" | "flag" => Ok(SuccessRule::ExplicitFlag),
            other => Err(format!(
                "CALL_SUCCESS_RULE must be 'call_successful' or 'call_status', got '{}'",
                other
            )),
        }
    }
}

/// Renders one payload leaf: strings verbatim, absent or `null` as `N/A`,
/// anything else as JSON text.
pub fn display_leaf(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn as_millis(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|ms| ms.is_finite())
}

/// Formats an epoch-millisecond start time as a readable UTC timestamp,
/// e.g. `1/15/2025, 2:30:00 PM`.
pub fn format_start_time(value: Option<&Value>) -> String {
    as_millis(value)
        .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats a millisecond duration as `"M mins S secs"`.
///
/// Minutes are floored; the remaining seconds are rounded, so 59.5 s of
/// remainder shows as 60 secs.
pub fn format_duration(value: Option<&Value>) -> String {
    match as_millis(value) {
        Some(ms) => {
            let minutes = (ms / 60_000.0).floor() as i64;
            let seconds = ((ms % 60_000.0) / 1000.0).round() as i64;
            format!("{} mins {} secs", minutes, seconds)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Display-ready view of one analyzed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallReport {
    pub call_id: String,
    pub call_status: String,
    pub start_time: String,
    pub end_timestamp: String,
    pub duration: String,
    pub transcript: String,
    pub recording_url: String,
    pub disconnection_reason: String,
    pub from_number: String,
    pub to_number: String,
    pub customer_name: String,
    pub email_address: String,
    pub target_pest: String,
    pub scheduled_time: String,
    pub user_phone_number: String,
    pub user_address: String,
    pub call_type: String,
    pub call_summary: String,
    pub user_sentiment: String,
    pub agent_task_completion_rating: String,
    pub call_completion_rating: String,
    pub call_successful: bool,
    pub combined_cost: String,
}

impl CallReport {
    /// Projects the payload, defaulting each leaf independently.
    pub fn from_payload(payload: &CallWebhookPayload) -> Self {
        let call = payload.call.clone().unwrap_or_default();
        let analysis: CallAnalysis = call.call_analysis.clone().unwrap_or_default();
        let custom: CustomAnalysisData = analysis.custom_analysis_data.clone().unwrap_or_default();
        let combined_cost = payload
            .call_cost
            .as_ref()
            .and_then(|c| c.combined_cost.as_ref())
            .or_else(|| call.call_cost.as_ref().and_then(|c| c.combined_cost.as_ref()));
        let call_summary = analysis
            .call_summary
            .as_ref()
            .filter(|v| !v.is_null())
            .or(custom.call_summary.as_ref());

        Self {
            call_id: display_leaf(call.call_id.as_ref()),
            call_status: display_leaf(call.call_status.as_ref()),
            start_time: format_start_time(call.start_timestamp.as_ref()),
            end_timestamp: display_leaf(call.end_timestamp.as_ref()),
            duration: format_duration(call.duration_ms.as_ref()),
            transcript: display_leaf(call.transcript.as_ref()),
            recording_url: display_leaf(call.recording_url.as_ref()),
            disconnection_reason: display_leaf(call.disconnection_reason.as_ref()),
            from_number: display_leaf(call.from_number.as_ref()),
            to_number: display_leaf(call.to_number.as_ref()),
            customer_name: display_leaf(custom.customer_name.as_ref()),
            email_address: display_leaf(custom.email_address.as_ref()),
            target_pest: display_leaf(custom.target_pest.as_ref()),
            scheduled_time: display_leaf(custom.scheduled_time.as_ref()),
            user_phone_number: display_leaf(custom.user_phone_number.as_ref()),
            user_address: display_leaf(custom.user_address.as_ref()),
            call_type: display_leaf(custom.call_type.as_ref()),
            call_summary: display_leaf(call_summary),
            user_sentiment: display_leaf(analysis.user_sentiment.as_ref()),
            agent_task_completion_rating: display_leaf(
                analysis.agent_task_completion_rating.as_ref(),
            ),
            call_completion_rating: display_leaf(analysis.call_completion_rating.as_ref()),
            call_successful: analysis
                .call_successful
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false),
            combined_cost: display_leaf(combined_cost),
        }
    }

    pub fn is_successful(&self, rule: SuccessRule) -> bool {
        match rule {
            SuccessRule::CallStatus => self.call_status == "ended",
            SuccessRule::ExplicitFlag => self.call_successful,
        }
    }

    /// Renders the email body. Field values are inserted as-is.
    pub fn render_html(&self, rule: SuccessRule) -> String {
        let successful = if self.is_successful(rule) { "Yes" } else { "No" };

        format!(
            r#"
        <h1>Call Analysis Report</h1>
        <p><strong>Date & Time:</strong> {start_time}</p>
        <p><strong>Call ID:</strong> {call_id}</p>
        <p><strong>Campaign Name:</strong> {campaign}</p>
        <p><strong>Customer Name:</strong> {customer_name}</p>
        <p><strong>Phone Number:</strong> {user_phone_number}</p>
        <p><strong>Email:</strong> {email_address}</p>
        <p><strong>Address:</strong> {user_address}</p>
        <p><strong>Target Pest:</strong> {target_pest}</p>
        <p><strong>Scheduled Date & Time:</strong> {scheduled_time}</p>
        <p><strong>Duration:</strong> {duration}</p>
        <p><strong>Cost:</strong> ${combined_cost}</p>
        <p><strong>Call Status:</strong> {call_status}</p>
        <p><strong>Disconnection Reason:</strong> {disconnection_reason}</p>
        <p><strong>From Number:</strong> {from_number}</p>
        <p><strong>To Number:</strong> {to_number}</p>
        <p><strong>Ticket Type:</strong> {call_type}</p>
        <p><strong>Call Summary:</strong> {call_summary}</p>
        <p><strong>User Sentiment:</strong> {user_sentiment}</p>
        <p><strong>Call Successful:</strong> {successful}</p>
        <p><strong>Agent Task Completion:</strong> {agent_task_completion_rating}</p>
        <p><strong>Call Completion:</strong> {call_completion_rating}</p>
        <p><strong>Transcript:</strong></p>
        <pre>{transcript}</pre>
        <p><strong>Recording:</strong> <a href="{recording_url}">Download</a></p>
      "#,
            start_time = self.start_time,
            call_id = self.call_id,
            campaign = CAMPAIGN_NAME,
            customer_name = self.customer_name,
            user_phone_number = self.user_phone_number,
            email_address = self.email_address,
            user_address = self.user_address,
            target_pest = self.target_pest,
            scheduled_time = self.scheduled_time,
            duration = self.duration,
            combined_cost = self.combined_cost,
            call_status = self.call_status,
            disconnection_reason = self.disconnection_reason,
            from_number = self.from_number,
            to_number = self.to_number,
            call_type = self.call_type,
            call_summary = self.call_summary,
            user_sentiment = self.user_sentiment,
            successful = successful,
            agent_task_completion_rating = self.agent_task_completion_rating,
            call_completion_rating = self.call_completion_rating,
            transcript = self.transcript,
            recording_url = self.recording_url,
        )
    }
}
