use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::Value;

use teamweight_server::line::{LineClient, Message, Messenger, NotificationError};
use teamweight_server::notifications::{dispatch_reminder, reminder_message};

/// (path, authorization header, body) of each call the mock receives.
type Seen = Arc<Mutex<Vec<(String, String, Value)>>>;

/// Start a fake Messaging API. Multicasts with more than `reject_over`
/// recipients get a 400.
async fn mock_line(reject_over: usize) -> (String, Seen) {
    let seen: Seen = Arc::default();

    async fn record(
        State((seen, reject_over, path)): State<(Seen, usize, &'static str)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let too_many = body["to"].as_array().is_some_and(|to| to.len() > reject_over);
        seen.lock().unwrap().push((path.to_string(), auth, body));
        if too_many {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }

    let app = axum::Router::new()
        .route(
            "/v2/bot/message/push",
            post(record).with_state((seen.clone(), reject_over, "push")),
        )
        .route(
            "/v2/bot/message/multicast",
            post(record).with_state((seen.clone(), reject_over, "multicast")),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

#[tokio::test]
async fn push_sends_bearer_token_and_messages() {
    let (base, seen) = mock_line(500).await;
    let client = LineClient::new(&base, Some("channel-token".into())).unwrap();

    client.push("U1", &[Message::text("hello")]).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (path, auth, body) = &seen[0];
    assert_eq!(path, "push");
    assert_eq!(auth, "Bearer channel-token");
    assert_eq!(body["to"], "U1");
    assert_eq!(body["messages"][0]["text"], "hello");
}

#[tokio::test]
async fn api_error_carries_status_and_body() {
    let (base, _seen) = mock_line(1).await;
    let client = LineClient::new(&base, Some("channel-token".into())).unwrap();

    let err = client
        .multicast(&["U1".into(), "U2".into()], &[Message::text("x")])
        .await
        .unwrap_err();
    assert!(matches!(err, NotificationError::ApiError { status: 400, .. }));
}

#[tokio::test]
async fn reminder_fan_out_reports_rejected_chunks() {
    // Full 500-recipient chunks are rejected; the 3-recipient tail is accepted.
    let (base, seen) = mock_line(499).await;
    let client = LineClient::new(&base, Some("channel-token".into())).unwrap();
    let recipients: Vec<String> = (0..1003).map(|i| format!("U{i}")).collect();

    let report = dispatch_reminder(&client, &recipients, &reminder_message(Some("1234-abcd"))).await;

    assert_eq!(seen.lock().unwrap().len(), 3);
    assert_eq!(report.failed, 1000);
    assert_eq!(report.sent, 3);
    assert!(report.chunks[2].error.is_none());
}
