//! Typed error handling for the relay
//!
//! Every failure a relay route can produce is a [`RelayError`]. Each variant
//! wraps a more specific error type for its category, and each category knows
//! its HTTP status and a stable error code.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: an endpoint is not configured or configuration is invalid
//! - [`RequestError`]: the caller sent something the relay cannot forward
//! - [`UpstreamError`]: the webhook answered badly or could not be reached
//!
//! # Example
//!
//! ```rust,ignore
//! use invoice_relay::prelude::*;
//!
//! fn resolve(config: &WebhookConfig, kind: DocumentKind) -> RelayResult<&str> {
//!     config
//!         .document_url(kind)
//!         .ok_or_else(|| ConfigError::MissingWebhook { target: kind.target() }.into())
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the relay
#[derive(Debug)]
pub enum RelayError {
    /// Configuration errors
    Config(ConfigError),

    /// Invalid input from the caller
    Request(RequestError),

    /// Failures talking to a webhook
    Upstream(UpstreamError),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Config(e) => write!(f, "{}", e),
            RelayError::Request(e) => write!(f, "{}", e),
            RelayError::Upstream(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Config(e) => Some(e),
            RelayError::Request(e) => Some(e),
            RelayError::Upstream(e) => Some(e),
        }
    }
}

/// Error envelope returned by both relay routes
///
/// `message` and `error` serve the upload contract, `success` the save
/// contract. `error` carries upstream text when there is any.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Request(e) => e.status_code(),
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::Config(e) => e.error_code(),
            RelayError::Request(e) => e.error_code(),
            RelayError::Upstream(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            message: self.public_message(),
            error: self.detail(),
        }
    }

    /// Message shown to the caller
    ///
    /// Configuration problems are reported generically; the operator finds
    /// the specifics in the logs.
    fn public_message(&self) -> String {
        match self {
            RelayError::Config(ConfigError::MissingWebhook { .. }) => {
                "Webhook URL is missing".to_string()
            }
            RelayError::Config(_) => "Relay is misconfigured".to_string(),
            RelayError::Upstream(UpstreamError::Status { .. }) => "Error from webhook".to_string(),
            RelayError::Upstream(_) => "Error forwarding to webhook".to_string(),
            RelayError::Request(e) => e.to_string(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            RelayError::Upstream(UpstreamError::Status { body, .. }) => Some(body.clone()),
            RelayError::Upstream(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        } else {
            tracing::warn!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// No webhook URL is configured for the target
    MissingWebhook { target: &'static str },

    /// A configured value could not be parsed
    InvalidValue { key: String, message: String },

    /// Failed to read or parse a configuration file
    ParseError { file: Option<String>, message: String },

    /// IO error while loading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingWebhook { target } => {
                write!(f, "No webhook URL configured for {}", target)
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "Invalid value for '{}': {}", key, message)
            }
            ConfigError::ParseError { file, message } => match file {
                Some(path) => write!(f, "Failed to parse config '{}': {}", path, message),
                None => write!(f, "Failed to parse config: {}", message),
            },
            ConfigError::IoError { message } => write!(f, "Config IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingWebhook { .. } => "WEBHOOK_NOT_CONFIGURED",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

impl From<ConfigError> for RelayError {
    fn from(err: ConfigError) -> Self {
        RelayError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors caused by the incoming request
#[derive(Debug)]
pub enum RequestError {
    /// The multipart form has no usable `file` part
    MissingFile,

    /// The body is not a readable multipart form
    InvalidForm { message: String },

    /// The body is not valid JSON
    InvalidBody { message: String },

    /// The upload exceeds the configured size limit
    PayloadTooLarge { limit: usize },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingFile => write!(f, "No file uploaded or invalid file"),
            RequestError::InvalidForm { message } => {
                write!(f, "Invalid upload form: {}", message)
            }
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::PayloadTooLarge { limit } => {
                write!(f, "Upload exceeds the {} byte limit", limit)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MissingFile => StatusCode::BAD_REQUEST,
            RequestError::InvalidForm { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingFile => "MISSING_FILE",
            RequestError::InvalidForm { .. } => "INVALID_FORM",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl From<RequestError> for RelayError {
    fn from(err: RequestError) -> Self {
        RelayError::Request(err)
    }
}

// =============================================================================
// Upstream Errors
// =============================================================================

/// Failures while calling a webhook
#[derive(Debug)]
pub enum UpstreamError {
    /// The webhook answered with a non-success status
    Status { status: u16, body: String },

    /// The webhook could not be reached or timed out
    Transport { message: String },

    /// The webhook answered with a body that is not JSON
    InvalidBody { message: String },
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status { status, body } => {
                write!(f, "Webhook responded with status {}: {}", status, body)
            }
            UpstreamError::Transport { message } => {
                write!(f, "Webhook request failed: {}", message)
            }
            UpstreamError::InvalidBody { message } => {
                write!(f, "Webhook returned an invalid body: {}", message)
            }
        }
    }
}

impl std::error::Error for UpstreamError {}

impl UpstreamError {
    pub fn error_code(&self) -> &'static str {
        match self {
            UpstreamError::Status { .. } => "UPSTREAM_STATUS",
            UpstreamError::Transport { .. } => "UPSTREAM_UNREACHABLE",
            UpstreamError::InvalidBody { .. } => "UPSTREAM_INVALID_BODY",
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        RelayError::Upstream(err)
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::InvalidBody {
                message: err.to_string(),
            }
        } else {
            UpstreamError::Transport {
                message: err.to_string(),
            }
        }
    }
}

// =============================================================================
// Standard Library Conversions
// =============================================================================

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Request(RequestError::InvalidBody {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
