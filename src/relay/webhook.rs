//! Outbound calls to the extraction and storage webhooks
//!
//! JSON travels through as [`RawValue`]: it is checked for well-formedness
//! but never re-serialized, so key order and number spelling reach the other
//! side exactly as they were sent.

use super::classify::content_disposition;
use crate::core::error::UpstreamError;
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde_json::value::RawValue;
use std::time::Duration;

/// A file received by the upload route, ready to forward
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Client for the external webhooks
///
/// The relay routes only talk to webhooks through this trait, so tests and
/// embedders can swap the HTTP implementation out.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Send a document's raw bytes and return the webhook's JSON reply
    async fn forward_document(
        &self,
        url: &str,
        document: UploadedDocument,
    ) -> Result<Box<RawValue>, UpstreamError>;

    /// Send a JSON payload; an empty reply body yields `None`
    async fn forward_json(
        &self,
        url: &str,
        payload: &RawValue,
    ) -> Result<Option<Box<RawValue>>, UpstreamError>;
}

/// [`WebhookClient`] over `reqwest`
#[derive(Clone)]
pub struct HttpWebhookClient {
    http: reqwest::Client,
}

impl HttpWebhookClient {
    /// Create a client whose calls time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::from_client(http))
    }

    /// Wrap an existing `reqwest` client
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn forward_document(
        &self,
        url: &str,
        document: UploadedDocument,
    ) -> Result<Box<RawValue>, UpstreamError> {
        tracing::debug!(
            file_name = %document.file_name,
            content_type = %document.content_type,
            size = document.bytes.len(),
            "Forwarding document to {}",
            url
        );

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, document.content_type.as_str())
            .header(CONTENT_DISPOSITION, content_disposition(&document.file_name))
            .body(document.bytes)
            .send()
            .await?;

        read_json_reply(response)
            .await?
            .ok_or_else(|| UpstreamError::InvalidBody {
                message: "empty response body".to_string(),
            })
    }

    async fn forward_json(
        &self,
        url: &str,
        payload: &RawValue,
    ) -> Result<Option<Box<RawValue>>, UpstreamError> {
        tracing::debug!("Forwarding JSON payload to {}", url);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.get().to_owned())
            .send()
            .await?;
        read_json_reply(response).await
    }
}

/// Check the status and validate the body of a webhook reply
async fn read_json_reply(
    response: reqwest::Response,
) -> Result<Option<Box<RawValue>>, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(None);
    }

    RawValue::from_string(body)
        .map(Some)
        .map_err(|e| UpstreamError::InvalidBody {
            message: e.to_string(),
        })
}
