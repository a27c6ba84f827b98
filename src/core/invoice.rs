//! The invoice record exchanged with the webhooks

use super::field::{InvoiceField, read_decimal, read_integer, read_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured invoice fields as returned by the extraction webhook
///
/// Every field is optional: the extraction service decides what it found,
/// and nothing here validates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

impl InvoiceRecord {
    /// Build the typed view from a JSON object, reading numbers leniently
    ///
    /// Numeric fields accept JSON numbers and numeric strings; values that
    /// do not fit the field's kind are left empty.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let get = |field: InvoiceField| fields.get(field.name());
        let text = |field| get(field).and_then(read_text);
        let decimal = |field| get(field).and_then(read_decimal);

        Self {
            invoice_number: text(InvoiceField::InvoiceNumber),
            item_name: text(InvoiceField::ItemName),
            item_description: text(InvoiceField::ItemDescription),
            quantity: get(InvoiceField::Quantity).and_then(read_integer),
            invoice_date: text(InvoiceField::InvoiceDate),
            unit_price: decimal(InvoiceField::UnitPrice),
            subtotal_amount: decimal(InvoiceField::SubtotalAmount),
            tax: decimal(InvoiceField::Tax),
            total_amount: decimal(InvoiceField::TotalAmount),
            discount: decimal(InvoiceField::Discount),
        }
    }

    /// Display text for a field; empty when the field is absent
    pub fn display(&self, field: InvoiceField) -> String {
        fn num(value: Option<f64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        match field {
            InvoiceField::InvoiceNumber => self.invoice_number.clone().unwrap_or_default(),
            InvoiceField::ItemName => self.item_name.clone().unwrap_or_default(),
            InvoiceField::ItemDescription => self.item_description.clone().unwrap_or_default(),
            InvoiceField::Quantity => self.quantity.map(|q| q.to_string()).unwrap_or_default(),
            InvoiceField::InvoiceDate => self.invoice_date.clone().unwrap_or_default(),
            InvoiceField::UnitPrice => num(self.unit_price),
            InvoiceField::SubtotalAmount => num(self.subtotal_amount),
            InvoiceField::Tax => num(self.tax),
            InvoiceField::TotalAmount => num(self.total_amount),
            InvoiceField::Discount => num(self.discount),
        }
    }
}
