//! Core types shared by the relay routes and the review session

pub mod error;
pub mod field;
pub mod invoice;

pub use error::{
    ConfigError, ErrorResponse, RelayError, RelayResult, RequestError, UpstreamError,
};
pub use field::{FieldInputError, FieldKind, InvoiceField};
pub use invoice::InvoiceRecord;
