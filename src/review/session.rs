//! Review session state machine

use super::client::RelayClient;
use super::draft::InvoiceDraft;
use super::{FileType, ReviewError, SelectedFile};
use crate::core::field::InvoiceField;
use crate::relay::handlers::SaveResponse;
use serde_json::Value;
use std::mem;

/// Where the review currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewState {
    /// Nothing picked yet
    NoFile,

    /// A file is picked; it can be uploaded only if its type is supported
    FileSelected { file: SelectedFile, file_type: FileType },

    /// The upload request is in flight
    Uploading { file: SelectedFile },

    /// Invoice data received, read-only
    Viewing { draft: InvoiceDraft },

    /// Invoice data received, fields editable
    Editing { draft: InvoiceDraft },

    /// The save request is in flight
    Saving { draft: InvoiceDraft, was_editing: bool },
}

impl ReviewState {
    fn name(&self) -> &'static str {
        match self {
            ReviewState::NoFile => "no file is selected",
            ReviewState::FileSelected { .. } => "a file is selected",
            ReviewState::Uploading { .. } => "uploading",
            ReviewState::Viewing { .. } => "viewing",
            ReviewState::Editing { .. } => "editing",
            ReviewState::Saving { .. } => "saving",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ReviewState::Uploading { .. } | ReviewState::Saving { .. })
    }
}

/// Message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// One review of one document at a time
#[derive(Debug, Clone)]
pub struct ReviewSession {
    state: ReviewState,
    notice: Option<Notice>,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            state: ReviewState::NoFile,
            notice: None,
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Whether the upload control is enabled
    pub fn can_upload(&self) -> bool {
        matches!(
            &self.state,
            ReviewState::FileSelected { file_type, .. } if file_type.is_supported()
        )
    }

    /// The invoice under review, once data has been received
    pub fn draft(&self) -> Option<&InvoiceDraft> {
        match &self.state {
            ReviewState::Viewing { draft }
            | ReviewState::Editing { draft }
            | ReviewState::Saving { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, ReviewState::Editing { .. })
    }

    /// Pick a file, replacing any previous file or received data
    ///
    /// An unsupported type is still recorded as selected, but with an error
    /// notice, and cannot be uploaded.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<FileType, ReviewError> {
        self.ensure_idle()?;

        let file_type = file.file_type();
        self.notice = if file_type.is_supported() {
            None
        } else {
            Some(Notice::Error(ReviewError::InvalidFileType.to_string()))
        };
        self.state = ReviewState::FileSelected { file, file_type };
        Ok(file_type)
    }

    /// Start uploading the selected file; returns the file to send
    pub fn begin_upload(&mut self) -> Result<SelectedFile, ReviewError> {
        self.ensure_idle()?;

        match mem::replace(&mut self.state, ReviewState::NoFile) {
            ReviewState::FileSelected { file, file_type } if file_type.is_supported() => {
                self.state = ReviewState::Uploading { file: file.clone() };
                self.notice = None;
                Ok(file)
            }
            ReviewState::FileSelected { file, file_type } => {
                self.state = ReviewState::FileSelected { file, file_type };
                Err(ReviewError::InvalidFileType)
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(ReviewError::InvalidTransition {
                    action: "upload",
                    state,
                })
            }
        }
    }

    /// Apply the outcome of the upload request
    ///
    /// On success the session shows the received fields. On failure it goes
    /// back to the selected file with an error notice, and the failure is
    /// returned.
    pub fn finish_upload(
        &mut self,
        outcome: Result<Value, ReviewError>,
    ) -> Result<(), ReviewError> {
        let file = match mem::replace(&mut self.state, ReviewState::NoFile) {
            ReviewState::Uploading { file } => file,
            other => {
                let state = other.name();
                self.state = other;
                return Err(ReviewError::InvalidTransition {
                    action: "finish an upload",
                    state,
                });
            }
        };

        match outcome.and_then(|reply| InvoiceDraft::from_upload_response(&reply)) {
            Ok(draft) => {
                tracing::debug!(file_name = %file.name, "Invoice data received");
                self.state = ReviewState::Viewing { draft };
                self.notice = Some(Notice::Info("Invoice data received".to_string()));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file_name = %file.name, "Upload failed: {}", e);
                let file_type = file.file_type();
                self.state = ReviewState::FileSelected { file, file_type };
                self.notice = Some(Notice::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Switch between viewing and editing; returns whether editing is now on
    pub fn toggle_edit(&mut self) -> Result<bool, ReviewError> {
        self.ensure_idle()?;

        match mem::replace(&mut self.state, ReviewState::NoFile) {
            ReviewState::Viewing { draft } => {
                self.state = ReviewState::Editing { draft };
                Ok(true)
            }
            ReviewState::Editing { draft } => {
                self.state = ReviewState::Viewing { draft };
                Ok(false)
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(ReviewError::InvalidTransition {
                    action: "edit",
                    state,
                })
            }
        }
    }

    /// Change one field while editing
    pub fn edit_field(&mut self, field: InvoiceField, input: &str) -> Result<(), ReviewError> {
        match &mut self.state {
            ReviewState::Editing { draft } => {
                draft.set_field(field, input)?;
                Ok(())
            }
            other => Err(ReviewError::InvalidTransition {
                action: "edit a field",
                state: other.name(),
            }),
        }
    }

    /// Start saving; returns the JSON body to send
    pub fn begin_save(&mut self) -> Result<Value, ReviewError> {
        self.ensure_idle()?;

        let (draft, was_editing) = match mem::replace(&mut self.state, ReviewState::NoFile) {
            ReviewState::Viewing { draft } => (draft, false),
            ReviewState::Editing { draft } => (draft, true),
            other => {
                let state = other.name();
                self.state = other;
                return Err(ReviewError::InvalidTransition {
                    action: "save",
                    state,
                });
            }
        };

        let payload = draft.payload();
        self.state = ReviewState::Saving { draft, was_editing };
        self.notice = None;
        Ok(payload)
    }

    /// Apply the outcome of the save request
    ///
    /// On success the saved values become the new baseline and the session
    /// goes back to viewing. On failure the edits are kept, the session goes
    /// back to where it was, and the failure is returned.
    pub fn finish_save(
        &mut self,
        outcome: Result<SaveResponse, ReviewError>,
    ) -> Result<(), ReviewError> {
        let (mut draft, was_editing) = match mem::replace(&mut self.state, ReviewState::NoFile) {
            ReviewState::Saving { draft, was_editing } => (draft, was_editing),
            other => {
                let state = other.name();
                self.state = other;
                return Err(ReviewError::InvalidTransition {
                    action: "finish a save",
                    state,
                });
            }
        };

        match outcome {
            Ok(reply) => {
                draft.commit();
                self.state = ReviewState::Viewing { draft };
                self.notice = Some(Notice::Info(reply.message));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Save failed: {}", e);
                self.state = if was_editing {
                    ReviewState::Editing { draft }
                } else {
                    ReviewState::Viewing { draft }
                };
                self.notice = Some(Notice::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Upload the selected file through `client` and apply the reply
    pub async fn upload_with(&mut self, client: &RelayClient) -> Result<(), ReviewError> {
        let file = self.begin_upload()?;
        let outcome = client.upload(&file).await;
        self.finish_upload(outcome)
    }

    /// Save the current invoice through `client` and apply the reply
    pub async fn save_with(&mut self, client: &RelayClient) -> Result<(), ReviewError> {
        let payload = self.begin_save()?;
        let outcome = client.save(&payload).await;
        self.finish_save(outcome)
    }

    fn ensure_idle(&self) -> Result<(), ReviewError> {
        if self.is_busy() {
            Err(ReviewError::Busy)
        } else {
            Ok(())
        }
    }
}
