//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! variables override whatever the file set.

use crate::core::error::ConfigError;
use crate::relay::classify::DocumentKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Path of the optional YAML configuration file
pub const ENV_CONFIG_PATH: &str = "INVOICE_RELAY_CONFIG";
pub const ENV_BIND_ADDR: &str = "INVOICE_RELAY_BIND";
pub const ENV_WEBHOOK_PDF: &str = "N8N_WEBHOOK_PDF";
pub const ENV_WEBHOOK_IMAGE: &str = "N8N_WEBHOOK_IMAGE";
pub const ENV_WEBHOOK_SAVE: &str = "GOOGLE_SHEETS_WEBHOOK_URL";
pub const ENV_MAX_UPLOAD_BYTES: &str = "INVOICE_RELAY_MAX_UPLOAD_BYTES";
pub const ENV_TIMEOUT_SECS: &str = "INVOICE_RELAY_TIMEOUT_SECS";

/// External webhook endpoints
///
/// A missing or blank URL means the endpoint is not configured; requests
/// that need it fail without any network call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Extraction webhook for PDF documents
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Extraction webhook for images (and anything that is not a PDF)
    #[serde(default)]
    pub image_url: Option<String>,

    /// Storage webhook receiving finalized invoices
    #[serde(default)]
    pub save_url: Option<String>,
}

impl WebhookConfig {
    /// Endpoint for an uploaded document of the given kind
    pub fn document_url(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Pdf => non_blank(&self.pdf_url),
            DocumentKind::Image => non_blank(&self.image_url),
        }
    }

    /// Endpoint for saving an edited invoice
    pub fn save_url(&self) -> Option<&str> {
        non_blank(&self.save_url)
    }
}

fn non_blank(url: &Option<String>) -> Option<&str> {
    url.as_deref().map(str::trim).filter(|u| !u.is_empty())
}

/// Complete relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub webhooks: WebhookConfig,

    /// Largest accepted upload body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Timeout for each outbound webhook call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            webhooks: WebhookConfig::default(),
            max_upload_bytes: default_max_upload_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the process configuration
    ///
    /// Reads the YAML file named by `INVOICE_RELAY_CONFIG` when set, then
    /// applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match lookup_env(ENV_CONFIG_PATH) {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_yaml_file(&path)?
            }
            None => Self::default(),
        };
        base.with_overrides(lookup_env)
    }

    /// Apply overrides from a variable lookup (the environment, in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Some(url) = lookup(ENV_WEBHOOK_PDF) {
            self.webhooks.pdf_url = Some(url);
        }
        if let Some(url) = lookup(ENV_WEBHOOK_IMAGE) {
            self.webhooks.image_url = Some(url);
        }
        if let Some(url) = lookup(ENV_WEBHOOK_SAVE) {
            self.webhooks.save_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_MAX_UPLOAD_BYTES) {
            self.max_upload_bytes = parse_value(ENV_MAX_UPLOAD_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_value(ENV_TIMEOUT_SECS, &raw)?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Log which endpoints are configured
    pub fn log_summary(&self) {
        let state = |url: Option<&str>| if url.is_some() { "configured" } else { "missing" };
        tracing::info!(
            pdf = state(self.webhooks.document_url(DocumentKind::Pdf)),
            image = state(self.webhooks.document_url(DocumentKind::Image)),
            save = state(self.webhooks.save_url()),
            "Webhook endpoints"
        );
    }
}

fn lookup_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
