//! In-process webhook fixture server

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Received {
    pub query: HashMap<String, String>,
    pub body: Value,
}

#[derive(Clone)]
struct Fixture {
    received: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
}

pub struct WebhookServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl WebhookServer {
    /// Start a server answering every POST with `status`
    pub async fn start(status: StatusCode) -> WebhookServer {
        let received = Arc::new(Mutex::new(Vec::new()));
        let fixture = Fixture {
            received: received.clone(),
            status,
        };
        let app = Router::new()
            .route("/v1/spaces/TEST/messages", post(hook))
            .with_state(fixture);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fixture server");
        });

        WebhookServer { addr, received }
    }

    /// Webhook URL in the shape Google Chat hands out (already has a query)
    pub fn url(&self) -> String {
        format!("http://{}/v1/spaces/TEST/messages?key=test-key&token=test-token", self.addr)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn hook(
    State(fixture): State<Fixture>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    fixture
        .received
        .lock()
        .unwrap()
        .push(Received { query, body });
    fixture.status
}
