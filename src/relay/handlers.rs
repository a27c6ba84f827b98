//! HTTP handlers for the upload and save routes

use super::classify::DocumentKind;
use super::webhook::{UploadedDocument, WebhookClient};
use crate::config::WebhookConfig;
use crate::core::error::{ConfigError, RelayResult, RequestError};
use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::sync::Arc;

/// Content type assumed for file parts that declare none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Name of the multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// Shared state for the relay routes
#[derive(Clone)]
pub struct RelayState {
    pub webhooks: Arc<WebhookConfig>,
    pub client: Arc<dyn WebhookClient>,
    /// Upload size limit, reported back when a body exceeds it
    pub max_upload_bytes: usize,
}

/// Success envelope of the save route
///
/// `result` holds the storage webhook's reply as it was received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<RawValue>>,
}

/// `POST /api/upload`
///
/// Forwards the `file` part to the extraction webhook for its type and
/// returns the webhook's JSON unchanged.
pub async fn upload_document(
    State(state): State<RelayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> RelayResult<Json<Box<RawValue>>> {
    let mut multipart = multipart.map_err(|e| RequestError::InvalidForm {
        message: e.body_text(),
    })?;

    let document = read_file_field(&mut multipart, state.max_upload_bytes).await?;
    let kind = DocumentKind::from_mime(&document.content_type);

    let url = state
        .webhooks
        .document_url(kind)
        .ok_or(ConfigError::MissingWebhook {
            target: kind.target(),
        })?;

    tracing::info!(
        %kind,
        file_name = %document.file_name,
        size = document.bytes.len(),
        "Forwarding upload to extraction webhook"
    );

    let reply = state.client.forward_document(url, document).await?;
    tracing::debug!("Extraction webhook replied: {}", reply.get());

    Ok(Json(reply))
}

/// `POST /api/save`
///
/// Forwards the JSON body, byte for byte, to the storage webhook. The body
/// only has to be well-formed JSON; its content type is not checked.
pub async fn save_invoice(
    State(state): State<RelayState>,
    body: Bytes,
) -> RelayResult<Json<SaveResponse>> {
    let url = state.webhooks.save_url().ok_or(ConfigError::MissingWebhook {
        target: "invoice storage",
    })?;

    let payload: &RawValue = serde_json::from_slice(&body)?;

    tracing::info!("Forwarding invoice to storage webhook");
    let result = state.client.forward_json(url, payload).await?;

    Ok(Json(SaveResponse {
        success: true,
        message: "Data forwarded successfully".to_string(),
        result,
    }))
}

/// Find the first `file` part of the form
///
/// A `file` part without a file name is a plain text field, not a file.
async fn read_file_field(
    multipart: &mut Multipart,
    limit: usize,
) -> RelayResult<UploadedDocument> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(RequestError::MissingFile.into()),
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        return Ok(UploadedDocument {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(RequestError::MissingFile.into())
}

fn multipart_error(err: MultipartError, limit: usize) -> RequestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RequestError::PayloadTooLarge { limit }
    } else {
        RequestError::InvalidForm {
            message: err.body_text(),
        }
    }
}
