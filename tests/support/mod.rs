//! Shared fixtures for the relay integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use invoice_relay::prelude::*;
use serde_json::Value;
use serde_json::value::RawValue;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const PDF_URL: &str = "http://hooks.test/pdf";
pub const IMAGE_URL: &str = "http://hooks.test/image";
pub const SAVE_URL: &str = "http://hooks.test/save";

/// A call received by the recording client
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Document {
        url: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    /// `body` is the JSON text exactly as handed to the client
    Json {
        url: String,
        body: String,
    },
}

/// What the recording client answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// JSON text returned as-is
    Raw(&'static str),
    Empty,
    Status(u16, String),
    Unreachable,
}

/// [`WebhookClient`] that records calls instead of making them
#[derive(Clone)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<Call>>>,
    reply: Reply,
}

impl RecordingClient {
    pub fn replying(reply: Reply) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self) -> Result<Option<Box<RawValue>>, UpstreamError> {
        match &self.reply {
            Reply::Json(value) => Ok(Some(serde_json::value::to_raw_value(value).unwrap())),
            Reply::Raw(text) => Ok(Some(RawValue::from_string(text.to_string()).unwrap())),
            Reply::Empty => Ok(None),
            Reply::Status(status, body) => Err(UpstreamError::Status {
                status: *status,
                body: body.clone(),
            }),
            Reply::Unreachable => Err(UpstreamError::Transport {
                message: "connection refused".to_string(),
            }),
        }
    }
}

#[async_trait]
impl WebhookClient for RecordingClient {
    async fn forward_document(
        &self,
        url: &str,
        document: UploadedDocument,
    ) -> Result<Box<RawValue>, UpstreamError> {
        self.calls.lock().unwrap().push(Call::Document {
            url: url.to_string(),
            file_name: document.file_name,
            content_type: document.content_type,
            bytes: document.bytes.to_vec(),
        });
        self.answer()?.ok_or_else(|| UpstreamError::InvalidBody {
            message: "empty response body".to_string(),
        })
    }

    async fn forward_json(
        &self,
        url: &str,
        payload: &RawValue,
    ) -> Result<Option<Box<RawValue>>, UpstreamError> {
        self.calls.lock().unwrap().push(Call::Json {
            url: url.to_string(),
            body: payload.get().to_string(),
        });
        self.answer()
    }
}

/// Configuration with every webhook pointing at the fake hosts
pub fn full_config() -> RelayConfig {
    RelayConfig {
        webhooks: WebhookConfig {
            pdf_url: Some(PDF_URL.to_string()),
            image_url: Some(IMAGE_URL.to_string()),
            save_url: Some(SAVE_URL.to_string()),
        },
        ..Default::default()
    }
}

/// Relay router backed by a recording client
pub fn relay_app(config: RelayConfig, client: RecordingClient) -> Router {
    ServerBuilder::new()
        .with_config(config)
        .with_webhook_client(client)
        .build()
        .expect("Failed to build relay router")
}

/// Serve a router on an ephemeral local port
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}
