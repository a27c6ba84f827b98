//! Invoice field names, kinds and input parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::sync::OnceLock;

/// The fields of an invoice record, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    InvoiceNumber,
    ItemName,
    ItemDescription,
    Quantity,
    InvoiceDate,
    UnitPrice,
    SubtotalAmount,
    Tax,
    TotalAmount,
    Discount,
}

/// How a field's value is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
}

impl InvoiceField {
    pub const ALL: [InvoiceField; 10] = [
        InvoiceField::InvoiceNumber,
        InvoiceField::ItemName,
        InvoiceField::ItemDescription,
        InvoiceField::Quantity,
        InvoiceField::InvoiceDate,
        InvoiceField::UnitPrice,
        InvoiceField::SubtotalAmount,
        InvoiceField::Tax,
        InvoiceField::TotalAmount,
        InvoiceField::Discount,
    ];

    /// Key used in the JSON exchanged with the webhooks
    pub fn name(self) -> &'static str {
        match self {
            InvoiceField::InvoiceNumber => "invoice_number",
            InvoiceField::ItemName => "item_name",
            InvoiceField::ItemDescription => "item_description",
            InvoiceField::Quantity => "quantity",
            InvoiceField::InvoiceDate => "invoice_date",
            InvoiceField::UnitPrice => "unit_price",
            InvoiceField::SubtotalAmount => "subtotal_amount",
            InvoiceField::Tax => "tax",
            InvoiceField::TotalAmount => "total_amount",
            InvoiceField::Discount => "discount",
        }
    }

    /// Name shown to the person reviewing the invoice
    pub fn label(self) -> &'static str {
        match self {
            InvoiceField::InvoiceNumber => "Invoice Number",
            InvoiceField::ItemName => "Item Name",
            InvoiceField::ItemDescription => "Item Description",
            InvoiceField::Quantity => "Quantity",
            InvoiceField::InvoiceDate => "Invoice Date",
            InvoiceField::UnitPrice => "Unit Price",
            InvoiceField::SubtotalAmount => "Subtotal",
            InvoiceField::Tax => "Tax",
            InvoiceField::TotalAmount => "Total Amount",
            InvoiceField::Discount => "Discount",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            InvoiceField::InvoiceNumber
            | InvoiceField::ItemName
            | InvoiceField::ItemDescription
            | InvoiceField::InvoiceDate => FieldKind::Text,
            InvoiceField::Quantity => FieldKind::Integer,
            InvoiceField::UnitPrice
            | InvoiceField::SubtotalAmount
            | InvoiceField::Tax
            | InvoiceField::TotalAmount
            | InvoiceField::Discount => FieldKind::Decimal,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rejected user input for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInputError {
    pub field: InvoiceField,
    pub message: String,
}

impl fmt::Display for FieldInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.label(), self.message)
    }
}

impl std::error::Error for FieldInputError {}

impl FieldKind {
    /// Turn user-entered text into the JSON value stored for a field
    ///
    /// Blank input clears the field (`null`).
    pub fn parse_input(
        self,
        field: InvoiceField,
        input: &str,
    ) -> Result<Value, FieldInputError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }

        match self {
            FieldKind::Text => Ok(Value::String(input.to_string())),
            FieldKind::Integer => parse_integer(trimmed)
                .map(|n| Value::Number(n.into()))
                .ok_or_else(|| FieldInputError {
                    field,
                    message: format!("must be a whole number (got '{}')", trimmed),
                }),
            FieldKind::Decimal => parse_decimal(trimmed)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| FieldInputError {
                    field,
                    message: format!("must be a decimal number (got '{}')", trimmed),
                }),
        }
    }
}

fn decimal_regex() -> &'static Regex {
    static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();
    DECIMAL_REGEX.get_or_init(|| {
        // Optional sign, digits with optional thousands separators, optional fraction
        Regex::new(r"^[+-]?(\d{1,3}(,\d{3})+|\d+)(\.\d+)?$").expect("decimal pattern is valid")
    })
}

/// Parse a decimal written by a person or an extraction service
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if !decimal_regex().is_match(text) {
        return None;
    }
    text.replace(',', "").parse().ok()
}

/// Parse an integer, accepting thousands separators
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if !decimal_regex().is_match(text) || text.contains('.') {
        return None;
    }
    text.replace(',', "").parse().ok()
}

/// Read a decimal from a JSON number or numeric string
pub fn read_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Read an integer from a JSON number or numeric string
///
/// Whole-valued floats (`3.0`) count as integers.
pub fn read_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// Read text from a JSON value; numbers are rendered as written
pub fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
