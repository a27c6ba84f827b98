//! # invoice-relay
//!
//! A thin HTTP relay in front of two external webhooks, plus the client-side
//! review session that drives it.
//!
//! ## Features
//!
//! - **Upload proxy** (`POST /api/upload`): forwards a multipart `file` to the
//!   PDF or image extraction webhook, chosen by declared MIME type, and
//!   returns the webhook's JSON untouched
//! - **Save proxy** (`POST /api/save`): forwards an edited invoice, as-is, to
//!   the storage webhook
//! - **Review session**: state machine for picking, uploading, editing and
//!   saving an invoice, with busy guards against duplicate submissions
//! - **Typed errors**: every failure maps to a status code and error code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_relay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = RelayConfig::load()?;
//!     ServerBuilder::new().with_config(config).serve().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod relay;
pub mod review;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ConfigError, ErrorResponse, FieldKind, InvoiceField, InvoiceRecord, RelayError,
        RelayResult, RequestError, UpstreamError,
    };

    // === Config ===
    pub use crate::config::{RelayConfig, WebhookConfig};

    // === Relay ===
    pub use crate::relay::{
        DocumentKind, HttpWebhookClient, RelayState, SaveResponse, UploadedDocument,
        WebhookClient,
    };

    // === Review ===
    pub use crate::review::{
        FileType, InvoiceDraft, Notice, RelayClient, ReviewError, ReviewSession, ReviewState,
        SelectedFile,
    };

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
