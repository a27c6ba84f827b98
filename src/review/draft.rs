//! Invoice fields received from the extraction webhook, under review

use super::ReviewError;
use crate::core::field::{FieldInputError, InvoiceField, read_text};
use crate::core::invoice::InvoiceRecord;
use serde_json::{Map, Value};

/// Key under which the extraction webhook returns the invoice fields
pub const OUTPUT_KEY: &str = "output";

/// The received invoice object plus the user's edits
///
/// The object is kept as JSON so that keys this crate does not know about,
/// and the exact representation of untouched values, survive to the save.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    baseline: Map<String, Value>,
    current: Map<String, Value>,
}

impl InvoiceDraft {
    /// Extract the invoice fields from an upload response
    ///
    /// Accepted shapes:
    /// - `{"output": {...}}`
    /// - `{"output": "<JSON object as a string>"}`
    /// - `[{"output": {...}}]` (first element is used)
    /// - a bare object holding at least one known invoice field
    pub fn from_upload_response(response: &Value) -> Result<Self, ReviewError> {
        invoice_fields(response)
            .map(Self::from_fields)
            .ok_or(ReviewError::MissingInvoiceData)
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            baseline: fields.clone(),
            current: fields,
        }
    }

    /// Typed view of the current values
    pub fn record(&self) -> InvoiceRecord {
        InvoiceRecord::from_fields(&self.current)
    }

    /// The current JSON value of a field
    pub fn raw(&self, field: InvoiceField) -> Option<&Value> {
        self.current.get(field.name())
    }

    /// Text shown for a field, exactly as received or entered
    pub fn display(&self, field: InvoiceField) -> String {
        self.raw(field).and_then(read_text).unwrap_or_default()
    }

    /// Replace one field from user-entered text
    ///
    /// Input equal to what is already displayed leaves the stored value
    /// untouched, so a form that resubmits every field changes nothing.
    pub fn set_field(&mut self, field: InvoiceField, input: &str) -> Result<(), FieldInputError> {
        if input == self.display(field) {
            return Ok(());
        }

        let value = field.kind().parse_input(field, input)?;
        if value.is_null() && !self.current.contains_key(field.name()) {
            return Ok(());
        }

        self.current.insert(field.name().to_string(), value);
        Ok(())
    }

    /// Fields whose value differs from the last received or saved state
    pub fn changed_fields(&self) -> Vec<InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(|field| self.current.get(field.name()) != self.baseline.get(field.name()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.baseline
    }

    /// The JSON body sent to the save route
    pub fn payload(&self) -> Value {
        Value::Object(self.current.clone())
    }

    /// Make the current values the new baseline
    pub fn commit(&mut self) {
        self.baseline = self.current.clone();
    }

    /// Drop all edits since the last baseline
    pub fn revert(&mut self) {
        self.current = self.baseline.clone();
    }
}

fn invoice_fields(response: &Value) -> Option<Map<String, Value>> {
    match response {
        Value::Array(items) => items.first().and_then(invoice_fields),
        Value::Object(map) => match map.get(OUTPUT_KEY) {
            Some(Value::Object(fields)) => Some(fields.clone()),
            Some(Value::String(text)) => match serde_json::from_str(text) {
                Ok(Value::Object(fields)) => Some(fields),
                _ => None,
            },
            Some(_) => None,
            None if has_invoice_field(map) => Some(map.clone()),
            None => None,
        },
        _ => None,
    }
}

fn has_invoice_field(map: &Map<String, Value>) -> bool {
    InvoiceField::ALL
        .iter()
        .any(|field| map.contains_key(field.name()))
}
