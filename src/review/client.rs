//! HTTP client for the relay's upload and save routes

use super::{ReviewError, SelectedFile};
use crate::relay::handlers::{FILE_FIELD, SaveResponse};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// Calls a running relay the way the review front-end does
#[derive(Clone)]
pub struct RelayClient {
    base_url: String,
    http: reqwest::Client,
}

impl RelayClient {
    /// Create a client for the relay at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload a file and return the extraction webhook's reply
    pub async fn upload(&self, file: &SelectedFile) -> Result<Value, ReviewError> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if !file.mime_type.is_empty() {
            part = part.mime_str(&file.mime_type)?;
        }
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let text = read_reply(response).await?;
        serde_json::from_str(&text).map_err(|_| ReviewError::UnexpectedReply {
            message: "reply is not JSON".to_string(),
        })
    }

    /// Send an invoice to the save route
    pub async fn save(&self, record: &Value) -> Result<SaveResponse, ReviewError> {
        let response = self
            .http
            .post(self.url("/api/save"))
            .json(record)
            .send()
            .await?;

        let text = read_reply(response).await?;
        let reply: SaveResponse =
            serde_json::from_str(&text).map_err(|e| ReviewError::UnexpectedReply {
                message: e.to_string(),
            })?;

        if !reply.success {
            return Err(ReviewError::Rejected {
                status: 200,
                message: reply.message,
            });
        }
        Ok(reply)
    }
}

/// Read a relay reply, turning error statuses into [`ReviewError::Rejected`]
async fn read_reply(response: reqwest::Response) -> Result<String, ReviewError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let body: Option<Value> = serde_json::from_str(&text).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("error").or_else(|| b.get("message")))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ReviewError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(text)
}
