/// Integration tests for the outbound HTTP clients against mocked services.
use partner_webhooks_api::db_storage::PartnerServiceStore;
use partner_webhooks_api::email_client::{EmailSender, OutgoingEmail, ResendClient};
use partner_webhooks_api::models::PartnerServiceRow;
use partner_webhooks_api::rest_storage::RestPartnerServiceStore;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_row() -> PartnerServiceRow {
    PartnerServiceRow {
        partner_id: "p1".to_string(),
        name: Some("Acme".to_string()),
        address: "1 Main St; 2 Oak Ave".to_string(),
        number: Some("555-1212".to_string()),
        website: None,
        email: None,
        service_name: "Inspection".to_string(),
        service_enabled: Some(true),
        pricing_info: json!([{"infoChart": [{"title": "Base", "content": "Cost info"}]}]),
        protocol_info: json!({}),
    }
}

fn sample_email() -> OutgoingEmail {
    OutgoingEmail {
        from: "partner_va@gritppo.com".to_string(),
        to: vec!["evy@gritppo.com".to_string()],
        subject: "Call Analysis Report for Eco Pest Control".to_string(),
        html: "<h1>Call Analysis Report</h1>".to_string(),
    }
}

#[tokio::test]
async fn test_rest_store_posts_row_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/partner_services"))
        .and(header("apikey", "anon_key"))
        .and(header("authorization", "Bearer anon_key"))
        .and(body_partial_json(json!([{
            "partner_id": "p1",
            "address": "1 Main St; 2 Oak Ave",
            "service_name": "Inspection"
        }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = RestPartnerServiceStore::new(
        reqwest::Client::new(),
        mock_server.uri(),
        "anon_key".to_string(),
    );

    let result = store.insert_partner_service(&sample_row()).await;
    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test]
async fn test_rest_store_surfaces_api_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/partner_services"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&mock_server)
        .await;

    let store = RestPartnerServiceStore::new(
        reqwest::Client::new(),
        mock_server.uri(),
        "anon_key".to_string(),
    );

    let err = store.insert_partner_service(&sample_row()).await.unwrap_err();
    assert_eq!(err.message, "duplicate key value violates unique constraint");
}

#[tokio::test]
async fn test_resend_client_sends_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test"))
        .and(body_partial_json(json!({
            "from": "partner_va@gritppo.com",
            "to": ["evy@gritppo.com"],
            "subject": "Call Analysis Report for Eco Pest Control"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResendClient::new(reqwest::Client::new(), mock_server.uri(), "re_test".to_string());

    assert!(client.send(&sample_email()).await.is_ok());
}

#[tokio::test]
async fn test_resend_client_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid from address"))
        .mount(&mock_server)
        .await;

    let client = ResendClient::new(reqwest::Client::new(), mock_server.uri(), "re_test".to_string());

    let err = client.send(&sample_email()).await.unwrap_err();
    assert!(err.to_string().contains("422"));
    assert!(err.to_string().contains("invalid from address"));
}
