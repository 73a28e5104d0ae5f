use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The only call event that produces a report.
pub const CALL_ANALYZED_EVENT: &str = "call_analyzed";

/// Voice-call analytics webhook payload.
///
/// Every level is optional and every leaf is kept as a raw JSON value, so a
/// missing object or an unexpected type never fails the decode. Projection
/// into display strings happens in [`crate::call_report`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CallWebhookPayload {
    pub event: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub call: Option<CallDetails>,
    #[serde(deserialize_with = "lenient")]
    pub call_cost: Option<CallCost>,
}

impl CallWebhookPayload {
    /// Decodes a raw request body. Anything that does not decode becomes an
    /// empty payload with no event.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event.as_ref().and_then(Value::as_str)
    }
}

/// Decodes a nested object, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CallDetails {
    pub call_id: Option<Value>,
    pub call_status: Option<Value>,
    pub start_timestamp: Option<Value>,
    pub end_timestamp: Option<Value>,
    pub duration_ms: Option<Value>,
    pub transcript: Option<Value>,
    pub recording_url: Option<Value>,
    pub disconnection_reason: Option<Value>,
    pub from_number: Option<Value>,
    pub to_number: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub call_analysis: Option<CallAnalysis>,
    /// Some senders nest the cost block inside the call.
    #[serde(deserialize_with = "lenient")]
    pub call_cost: Option<CallCost>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CallAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub custom_analysis_data: Option<CustomAnalysisData>,
    pub call_summary: Option<Value>,
    pub user_sentiment: Option<Value>,
    pub agent_task_completion_rating: Option<Value>,
    pub call_completion_rating: Option<Value>,
    pub call_successful: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomAnalysisData {
    pub customer_name: Option<Value>,
    pub email_address: Option<Value>,
    pub target_pest: Option<Value>,
    pub scheduled_time: Option<Value>,
    pub user_phone_number: Option<Value>,
    pub user_address: Option<Value>,
    pub call_type: Option<Value>,
    pub call_summary: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CallCost {
    pub combined_cost: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_missing_intermediate_objects() {
        let payload = CallWebhookPayload::from_body(br#"{"event": "call_analyzed", "call": {}}"#);
        assert_eq!(payload.event_name(), Some("call_analyzed"));
        let call = payload.call.unwrap();
        assert!(call.call_analysis.is_none());
        assert!(payload.call_cost.is_none());
    }

    #[test]
    fn test_parse_null_objects() {
        let payload = CallWebhookPayload::from_body(
            br#"{"event": "call_analyzed", "call": {"call_analysis": null}, "call_cost": null}"#,
        );
        assert!(payload.call.unwrap().call_analysis.is_none());
    }

    #[test]
    fn test_wrong_shaped_object_is_absent() {
        let payload = CallWebhookPayload::from_body(
            br#"{"event": "call_analyzed", "call": "oops", "call_cost": 7}"#,
        );
        assert_eq!(payload.event_name(), Some("call_analyzed"));
        assert!(payload.call.is_none());
        assert!(payload.call_cost.is_none());
    }

    #[test]
    fn test_array_in_place_of_object_is_absent() {
        let payload = CallWebhookPayload::from_body(
            br#"{"event": "call_analyzed", "call": ["c-1", "ended"], "call_cost": [12.0]}"#,
        );
        assert!(payload.call.is_none());
        assert!(payload.call_cost.is_none());
    }

    #[test]
    fn test_non_json_body_has_no_event() {
        let payload = CallWebhookPayload::from_body(b"not json");
        assert_eq!(payload.event_name(), None);
    }

    #[test]
    fn test_non_string_event() {
        let payload = CallWebhookPayload::from_body(br#"{"event": 5}"#);
        assert_eq!(payload.event_name(), None);
    }
}
