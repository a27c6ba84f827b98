//! Client-side review of extracted invoices
//!
//! A [`ReviewSession`] is the state machine behind the review form: pick a
//! file, upload it through the relay, look at (and edit) the fields the
//! extraction webhook returned, then save them through the relay.
//!
//! ```text
//! NoFile ──select──▶ FileSelected ──upload──▶ Uploading ──ok──▶ Viewing ◀──toggle──▶ Editing
//!                         ▲                       │                │                    │
//!                         └─────────failed────────┘                └──save──▶ Saving ◀──┘
//! ```
//!
//! While a request is outstanding the session is busy and every user action
//! is rejected, so a second submission cannot happen.

pub mod client;
pub mod draft;
pub mod session;

pub use client::RelayClient;
pub use draft::InvoiceDraft;
pub use session::{Notice, ReviewSession, ReviewState};

use crate::core::field::FieldInputError;
use axum::body::Bytes;
use thiserror::Error;

/// Message shown when a picked file is neither a PDF nor an image
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Please upload a PDF or an image.";

/// Errors surfaced to the person reviewing an invoice
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{}", INVALID_FILE_TYPE)]
    InvalidFileType,

    #[error("A request is already in progress")]
    Busy,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Invalid value: {0}")]
    InvalidInput(#[from] FieldInputError),

    #[error("The upload response contains no invoice data")]
    MissingInvoiceData,

    #[error("Error: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected reply from relay: {message}")]
    UnexpectedReply { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// What kind of document the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Image,
    Other,
}

impl FileType {
    pub fn from_mime(mime: &str) -> Self {
        if mime.contains("pdf") {
            FileType::Pdf
        } else if mime.contains("image") {
            FileType::Image
        } else {
            FileType::Other
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, FileType::Other)
    }
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_mime(&self.mime_type)
    }
}
