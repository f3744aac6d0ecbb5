use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use form_relay::config::{Config, HandlerConfig, DEFAULT_HANDLER_PATH};
use form_relay::credential::ServiceCredential;

pub const CREDENTIAL: &str = "0123456789abcdefghijABCDEFGHIJ01";

/// How the fake external handler answers.
#[derive(Clone)]
#[allow(dead_code)]
pub enum HandlerReply {
    Json(StatusCode, Value),
    Raw(StatusCode, String),
    Hang(Duration),
}

/// One request seen by the fake external handler.
#[derive(Clone, Debug)]
pub struct Received {
    pub auth_token: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct HandlerState {
    reply: HandlerReply,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A running app plus the fake handler it relays to.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub received: Arc<Mutex<Vec<Received>>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Fetch a fresh anti-forgery token.
    pub async fn nonce(&self) -> String {
        let resp = self
            .client
            .get(self.url("/nonce"))
            .send()
            .await
            .expect("nonce request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["field"], "tt_nonce");
        body["token"].as_str().unwrap().to_string()
    }

    /// Post form-urlencoded fields to the submission endpoint.
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post a complete, valid submission with the given token and start time.
    pub async fn submit_valid(&self, token: &str, start_time: &str) -> (Value, StatusCode) {
        let mut fields = valid_fields();
        fields.push(("tt_nonce", token));
        fields.push(("start_time", start_time));
        self.submit_form(&fields).await
    }
}

pub fn valid_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("action", "tt_submit"),
        ("first_name", "Ada"),
        ("last_name", "Lovelace"),
        ("email", "ada@example.com"),
        ("phone", "+44 20 7946 0000"),
        ("address", "12 Analytical Row, London"),
    ]
}

pub fn now_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

async fn fake_handler(State(state): State<HandlerState>, headers: HeaderMap, body: Bytes) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };
    state.received.lock().unwrap().push(Received {
        auth_token: header("x-auth-token"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match state.reply {
        HandlerReply::Json(status, value) => (status, axum::Json(value)).into_response(),
        HandlerReply::Raw(status, text) => (status, text).into_response(),
        HandlerReply::Hang(duration) => {
            tokio::time::sleep(duration).await;
            axum::Json(json!({ "status": "ok" })).into_response()
        }
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}

fn config(handler_url: String) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        handler: HandlerConfig {
            url: Some(handler_url),
            scheme: "http".to_string(),
            path: DEFAULT_HANDLER_PATH.to_string(),
            timeout: Duration::from_secs(1),
        },
        nonce_secret: "test-nonce-secret-that-is-long-enough".to_string(),
        nonce_ttl: Duration::from_secs(3600),
        auth_token: Some(CREDENTIAL.to_string()),
        auth_token_file: PathBuf::from("unused"),
        max_body_size: 65_536,
        log_level: "warn".to_string(),
    }
}

async fn spawn_with_handler_url(handler_url: String, received: Arc<Mutex<Vec<Received>>>) -> TestApp {
    let credential = ServiceCredential::new(CREDENTIAL).unwrap();
    let app = form_relay::build_app(config(handler_url), credential).expect("Failed to build app");
    let addr = serve(app).await;

    TestApp {
        addr,
        client: Client::new(),
        received,
    }
}

/// Spawn the app relaying to a fake handler that answers with `reply`.
pub async fn spawn_app(reply: HandlerReply) -> TestApp {
    let received = Arc::new(Mutex::new(Vec::new()));
    let handler = Router::new()
        .route(DEFAULT_HANDLER_PATH, post(fake_handler))
        .with_state(HandlerState {
            reply,
            received: received.clone(),
        });
    let handler_addr = serve(handler).await;

    spawn_with_handler_url(format!("http://{handler_addr}{DEFAULT_HANDLER_PATH}"), received).await
}

/// Spawn the app relaying to a port nothing listens on.
#[allow(dead_code)]
pub async fn spawn_app_without_handler() -> TestApp {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_addr = listener.local_addr().unwrap();
    drop(listener);

    spawn_with_handler_url(
        format!("http://{dead_addr}{DEFAULT_HANDLER_PATH}"),
        Arc::new(Mutex::new(Vec::new())),
    )
    .await
}

pub fn ok_reply() -> HandlerReply {
    HandlerReply::Json(StatusCode::OK, json!({ "status": "ok" }))
}
