//! Upload and save proxy routes
//!
//! Both routes are pass-throughs: the upload route picks an extraction
//! webhook from the file's declared MIME type and forwards the raw bytes,
//! the save route forwards a JSON body to the storage webhook.

pub mod classify;
pub mod handlers;
pub mod webhook;

pub use classify::DocumentKind;
pub use handlers::{RelayState, SaveResponse, save_invoice, upload_document};
pub use webhook::{HttpWebhookClient, UploadedDocument, WebhookClient};
