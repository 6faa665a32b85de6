use std::fs;

use bulldozer_engine::{EmailSettings, FetchSettings, Notifier, NotifyError, SendGridNotifier};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> EmailSettings {
    EmailSettings {
        from: "noreply@example.com".to_string(),
        to: vec!["ops@example.com".to_string()],
        api_key: "SG.key".to_string(),
    }
}

#[tokio::test]
async fn sendgrid_request_carries_report_attachment() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("key.csv");
    fs::write(&report, "a,b\n").unwrap();

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer SG.key"))
        .and(body_partial_json(json!({
            "from": {"email": "noreply@example.com"},
            "subject": "key ArcGIS Server logs",
            "personalizations": [{"to": [{"email": "ops@example.com"}]}],
            "attachments": [{
                "content": "YSxiCg==",
                "filename": "key.csv",
                "type": "text/csv",
                "disposition": "attachment"
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = SendGridNotifier::with_endpoint(
        settings(),
        &FetchSettings::default(),
        &format!("{}/v3/mail/send", server.uri()),
    )
    .unwrap();
    notifier
        .send_email("key ArcGIS Server logs", "body", &report)
        .await
        .expect("email sent");
}

#[tokio::test]
async fn sendgrid_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let notifier = SendGridNotifier::with_endpoint(
        settings(),
        &FetchSettings::default(),
        &format!("{}/v3/mail/send", server.uri()),
    )
    .unwrap();
    let err = notifier
        .send_email("s", "", &dir.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Remote(_)), "got {err:?}");
}

#[test]
fn incomplete_settings_are_refused() {
    let mut incomplete = settings();
    incomplete.api_key = "  ".to_string();
    let err = SendGridNotifier::new(incomplete, &FetchSettings::default()).unwrap_err();
    assert!(matches!(err, NotifyError::NotConfigured));
}
