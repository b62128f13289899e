//! End-to-end tests for the HTTP surface
//!
//! Targets:
//! - POST /slack/events
//! - POST /slack/events/interactivity
//! - GET /health

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bitbot::config::AppConfig;
use bitbot::domain::bits::{self, Ledger, Roster};
use bitbot::domain::dispatch::{EventRouter, RouterSettings};
use bitbot::domain::slack::{OutgoingMessage, SlackApi};
use bitbot::domain::webhook::signature::{self, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use bitbot::utils::AppError;
use bitbot::{app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-signing-secret";
const BOT: &str = "UBOT";
const LOGS: &str = "CLOGS";

/// Records every outbound call instead of talking to Slack
#[derive(Default)]
struct RecordingSlack {
    messages: Mutex<Vec<OutgoingMessage>>,
    reactions: Mutex<Vec<(String, String, String)>>,
}

#[async_trait::async_trait]
impl SlackApi for RecordingSlack {
    async fn post_message(&self, message: OutgoingMessage) -> Result<(), AppError> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }

    async fn add_reaction(&self, channel: &str, timestamp: &str, name: &str) -> Result<(), AppError> {
        self.reactions
            .lock()
            .unwrap()
            .push((channel.to_string(), timestamp.to_string(), name.to_string()));
        Ok(())
    }

    async fn auth_test(&self) -> Result<String, AppError> {
        Ok(BOT.to_string())
    }
}

struct Harness {
    router: Router,
    slack: Arc<RecordingSlack>,
    ledger: Arc<Ledger>,
}

fn harness() -> Harness {
    let config = AppConfig::from_lookup(|key| {
        match key {
            "SLACK_BOT_TOKEN" => Some("xoxb-test"),
            "SLACK_SIGNING_SECRET" => Some(SECRET),
            "BOT_LOGS_CHANNEL" => Some(LOGS),
            "ENV_TEST" => Some("integration"),
            "BIT_TEAMS" => Some("Red,Blue"),
            _ => None,
        }
        .map(String::from)
    })
    .unwrap();

    let slack = Arc::new(RecordingSlack::default());
    let ledger = Arc::new(Ledger::new());
    let actions = bits::action_table(ledger.clone(), Roster::new(config.teams.clone()));
    let event_router = EventRouter::new(
        slack.clone(),
        actions,
        RouterSettings {
            bot_user_id: BOT.to_string(),
            audit_channel: config.bot_logs_channel.clone(),
            allowed_channels: config.allowed_channels.clone(),
        },
    );

    Harness {
        router: app(AppState::new(config, event_router)),
        slack,
        ledger,
    }
}

fn signed_request(uri: &str, content_type: &str, body: String, timestamp: i64) -> Request<Body> {
    let timestamp = timestamp.to_string();
    let signature = signature::sign(SECRET, &timestamp, body.as_bytes()).unwrap();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .header(SIGNATURE_HEADER, signature)
        .header(TIMESTAMP_HEADER, timestamp)
        .body(Body::from(body))
        .unwrap()
}

fn event_request(body: Value) -> Request<Body> {
    signed_request(
        "/slack/events",
        "application/json",
        body.to_string(),
        chrono::Utc::now().timestamp(),
    )
}

fn mention(text: &str) -> Value {
    json!({
        "type": "event_callback",
        "event": {
            "type": "app_mention",
            "channel": LOGS,
            "user": "UALICE",
            "text": text,
            "ts": "1700000000.000100"
        }
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_echo_url_verification_challenge() {
    // Arrange
    let h = harness();
    let request = event_request(json!({"type": "url_verification", "challenge": "abc123"}));

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"challenge": "abc123"}));
}

#[tokio::test]
async fn should_reject_bad_signature() {
    // Arrange
    let h = harness();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/slack/events")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, "v0=deadbeef")
        .header(TIMESTAMP_HEADER, chrono::Utc::now().timestamp().to_string())
        .body(Body::from(r#"{"type":"url_verification","challenge":"x"}"#))
        .unwrap();

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["code"], "COMMON401");
}

#[tokio::test]
async fn should_reject_stale_timestamp() {
    let h = harness();
    let body = json!({"type": "url_verification", "challenge": "x"}).to_string();
    let request = signed_request(
        "/slack/events",
        "application/json",
        body,
        chrono::Utc::now().timestamp() - 600,
    );

    let response = h.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_answer_bad_request_for_non_json_body() {
    let h = harness();
    let request = signed_request(
        "/slack/events",
        "application/json",
        "not json".to_string(),
        chrono::Utc::now().timestamp(),
    );

    let response = h.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "COMMON400");
}

#[tokio::test]
async fn should_give_bits_and_acknowledge_mention() {
    // Arrange
    let h = harness();
    let request = event_request(mention("<@UBOT> give <@UBOB> 5"));

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
    assert_eq!(h.ledger.balance("UBOB").await, 5);

    let reactions = h.slack.reactions.lock().unwrap().clone();
    assert_eq!(
        reactions,
        vec![(
            LOGS.to_string(),
            "1700000000.000100".to_string(),
            "white_check_mark".to_string()
        )]
    );
    let messages = h.slack.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.contains("<@UBOB>"));
}

#[tokio::test]
async fn should_audit_invalid_command() {
    // Arrange
    let h = harness();
    let request = event_request(mention("<@UBOT> dance"));

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let messages = h.slack.messages.lock().unwrap().clone();
    assert_eq!(
        messages,
        vec![OutgoingMessage::text(
            LOGS,
            "<@UALICE>: dance is not a valid action"
        )]
    );
    let reactions = h.slack.reactions.lock().unwrap().clone();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].2, "x");
}

#[tokio::test]
async fn should_ignore_mention_in_other_channel() {
    let h = harness();
    let mut body = mention("<@UBOT> give <@UBOB>");
    body["event"]["channel"] = json!("CRANDOM");

    let response = h.router.oneshot(event_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(h.slack.messages.lock().unwrap().is_empty());
    assert!(h.slack.reactions.lock().unwrap().is_empty());
    assert_eq!(h.ledger.balance("UBOB").await, 0);
}

#[tokio::test]
async fn should_handle_direct_message_command() {
    // Arrange
    let h = harness();
    let body = json!({
        "type": "event_callback",
        "event": {
            "type": "message",
            "channel": "DALICE",
            "channel_type": "im",
            "user": "UALICE",
            "text": "<@UBOT> help",
            "ts": "1700000000.000200"
        }
    });

    // Act
    let response = h.router.oneshot(event_request(body)).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let messages = h.slack.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel, "DALICE");
    assert!(messages[0].text.starts_with("*Commands*"));
}

#[tokio::test]
async fn should_join_team_from_interactivity_form() {
    // Arrange
    let h = harness();
    let payload = json!({
        "type": "block_actions",
        "user": {"id": "UALICE"},
        "actions": [{
            "action_id": "select_team_action",
            "selected_option": {"value": "Red"}
        }]
    })
    .to_string();
    let form = serde_urlencoded::to_string([("payload", payload)]).unwrap();
    let request = signed_request(
        "/slack/events/interactivity",
        "application/x-www-form-urlencoded",
        form,
        chrono::Utc::now().timestamp(),
    );

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.ledger.team_of("UALICE").await.as_deref(), Some("Red"));
    assert!(h.slack.reactions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_malformed_interactivity_payload() {
    let h = harness();
    let form = serde_urlencoded::to_string([("payload", "{not json")]).unwrap();
    let request = signed_request(
        "/slack/events/interactivity",
        "application/x-www-form-urlencoded",
        form,
        chrono::Utc::now().timestamp(),
    );

    let response = h.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let messages = h.slack.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel, LOGS);
    assert!(messages[0].text.starts_with("<@unknown>: an exception occurred - "));
}

#[tokio::test]
async fn should_return_health_value() {
    // Arrange
    let h = harness();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = h.router.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await, json!({"health": "integration"}));
}
