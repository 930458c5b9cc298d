// Notifier + webhook relay tests against a mock HTTP server

use heatwatch::config::NotifyConfig;
use heatwatch::notify::{ChannelError, Notifier, NotifyChannel, NotifyEvent, RelayMessage, WebhookChannel};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhook(url: String, recipients: Vec<String>) -> WebhookChannel {
    WebhookChannel::new(
        url,
        "alerts@example.org".to_string(),
        recipients,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn record_alert_is_posted_to_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({
            "sender": "alerts@example.org",
            "recipients": ["a@example.org", "b@example.org"],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let channel = webhook(
        format!("{}/send", server.uri()),
        vec!["a@example.org".into(), "b@example.org".into()],
    );
    let event = NotifyEvent::RecordBroken {
        location: "Maria Island".into(),
        depth: Some("2m (2024)".into()),
        new_value: 3.9,
        previous_value: Some(3.2),
    };
    channel.send(&event).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let message: RelayMessage = requests[0].body_json().unwrap();
    assert_eq!(message.subject, event.subject());
    assert!(message.body.contains("3.90°C"));
    assert!(message.body.contains("Maria Island at 2m (2024)"));
}

#[tokio::test]
async fn relay_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let channel = webhook(server.uri(), vec!["a@example.org".into()]);
    let event = NotifyEvent::RecordBroken {
        location: "Maria Island".into(),
        depth: None,
        new_value: 1.5,
        previous_value: None,
    };
    let err = channel.send(&event).await.unwrap_err();
    match err {
        ChannelError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn acknowledgement_goes_only_to_subscriber() {
    let channel = webhook(
        "http://127.0.0.1:9/send".into(),
        vec!["a@example.org".into()],
    );
    let message = channel.message_for(&NotifyEvent::SubscriptionAck {
        location: "Maria Island".into(),
        subscriber: "new@example.org".into(),
    });
    assert_eq!(message.recipients, vec!["new@example.org".to_string()]);
    assert!(message.subject.contains("hotlist"));
    assert!(message.body.contains("Maria Island"));
}

#[tokio::test]
async fn empty_recipient_list_is_not_configured() {
    let channel = webhook("http://127.0.0.1:9/send".into(), vec![]);
    let event = NotifyEvent::RecordBroken {
        location: "Maria Island".into(),
        depth: None,
        new_value: 1.5,
        previous_value: None,
    };
    let err = channel.send(&event).await.unwrap_err();
    assert!(matches!(err, ChannelError::NotConfigured(_)));
}

#[tokio::test]
async fn notifier_from_config_reports_each_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = NotifyConfig {
        webhook_url: Some(server.uri()),
        sender: "alerts@example.org".into(),
        recipients: vec!["a@example.org".into()],
        ..NotifyConfig::default()
    };
    let notifier = Notifier::from_config(&config).unwrap();
    assert_eq!(notifier.channel_count(), 2);

    let results = notifier
        .notify_record(true, 2.2, Some(2.0), "Maria Island", None)
        .await;
    let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["log", "webhook"]);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
}

#[test]
fn notifier_disabled_in_config_has_no_channels() {
    let config = NotifyConfig {
        enabled: false,
        ..NotifyConfig::default()
    };
    let notifier = Notifier::from_config(&config).unwrap();
    assert_eq!(notifier.channel_count(), 0);
}

#[tokio::test]
async fn acknowledgement_reports_relay_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "recipients": ["new@example.org"] })))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let config = NotifyConfig {
        webhook_url: Some(server.uri()),
        sender: "alerts@example.org".into(),
        recipients: vec!["a@example.org".into()],
        ..NotifyConfig::default()
    };
    let notifier = Notifier::from_config(&config).unwrap();
    let err = notifier
        .acknowledge("Maria Island", "new@example.org")
        .await
        .unwrap_err();
    assert!(matches!(err, ChannelError::Status { status: 502, .. }));
}

#[tokio::test]
async fn acknowledgement_counts_deliveries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let config = NotifyConfig {
        webhook_url: Some(server.uri()),
        sender: "alerts@example.org".into(),
        recipients: vec![],
        ..NotifyConfig::default()
    };
    let notifier = Notifier::from_config(&config).unwrap();
    let delivered = notifier
        .acknowledge("Maria Island", "new@example.org")
        .await
        .unwrap();
    assert_eq!(delivered, 2);
}
