use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single invoice field value. Source documents are permissive: a field
/// may arrive as text, an integer, or a float, and numbers are sometimes
/// string-encoded (or malformed). Coercions are explicit and fallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("value `{0}` is not numeric")]
    NotNumeric(String),
    #[error("value is not text")]
    NotText,
}

impl FieldValue {
    /// Numeric view of the value. String-encoded numbers are parsed after
    /// trimming, mirroring how permissive the source documents are.
    pub fn as_number(&self) -> Result<f64, FieldError> {
        match self {
            FieldValue::Int(i) => Ok(*i as f64),
            FieldValue::Float(f) => Ok(*f),
            FieldValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FieldError::NotNumeric(s.clone())),
        }
    }

    /// Text view of the value; numbers are not silently stringified.
    pub fn as_text(&self) -> Result<&str, FieldError> {
        match self {
            FieldValue::Str(s) => Ok(s),
            _ => Err(FieldError::NotText),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{s}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A flat invoice record: named fields with heterogeneous value types.
/// Fields may be absent, empty, or type-inconsistent; none of that is an
/// error at this layer. Consumed once per simulation and never mutated in
/// place; the remediator works on a clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceRecord {
    pub fields: BTreeMap<String, FieldValue>,
}

impl InvoiceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    /// Numeric view of a field, when present and coercible.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_number().ok())
    }

    /// Rendered view of a field, when present.
    pub fn display(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }

    /// True when the field is absent or an empty/whitespace string.
    pub fn is_blank(&self, name: &str) -> bool {
        match self.get(name) {
            None => true,
            Some(FieldValue::Str(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }
}

/// One detected data-quality defect. Closed set; detection order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    MissingInvoiceId,
    InvalidDateFormat,
    NegativeQuantity,
    NonNumericTotal,
    MissingRequiredFields,
    MismatchedTotal,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingInvoiceId => "missing_invoice_id",
            IssueCode::InvalidDateFormat => "invalid_date_format",
            IssueCode::NegativeQuantity => "negative_quantity",
            IssueCode::NonNumericTotal => "non_numeric_total",
            IssueCode::MissingRequiredFields => "missing_required_fields",
            IssueCode::MismatchedTotal => "mismatched_total",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successfully applied automated repair. Closed set; attempt order is
/// fixed and matches the remediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixCode {
    GeneratedInvoiceId,
    FixedDateFormat,
    DefaultedDate,
    FixedNegativeQuantity,
    ExtractedNumericTotal,
    InferredTotalFromFields,
    InferredQuantityFromTotal,
    DefaultedQuantity,
    InferredUnitPriceFromTotal,
    DefaultedUnitPrice,
    RecalculatedTotal,
    DefaultedVendorName,
}

impl FixCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixCode::GeneratedInvoiceId => "generated_invoice_id",
            FixCode::FixedDateFormat => "fixed_date_format",
            FixCode::DefaultedDate => "defaulted_date",
            FixCode::FixedNegativeQuantity => "fixed_negative_quantity",
            FixCode::ExtractedNumericTotal => "extracted_numeric_total",
            FixCode::InferredTotalFromFields => "inferred_total_from_fields",
            FixCode::InferredQuantityFromTotal => "inferred_quantity_from_total",
            FixCode::DefaultedQuantity => "defaulted_quantity",
            FixCode::InferredUnitPriceFromTotal => "inferred_unit_price_from_total",
            FixCode::DefaultedUnitPrice => "defaulted_unit_price",
            FixCode::RecalculatedTotal => "recalculated_total",
            FixCode::DefaultedVendorName => "defaulted_vendor_name",
        }
    }
}

impl fmt::Display for FixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure taxonomy for pipeline outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Content defects a human also struggles with.
    DataQuality,
    /// Manual-side infrastructure incident independent of content.
    SystemOperational,
    /// Automated-side infrastructure incident independent of content.
    SystemProcessing,
    /// The automated step cannot even start on the record.
    DataExtraction,
    /// Unexpected error caught at the manual pipeline boundary.
    UnknownBaselineError,
    /// Unexpected error caught at the automated pipeline boundary.
    UnknownKognitosError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DataQuality => "data_quality",
            ErrorKind::SystemOperational => "system_operational",
            ErrorKind::SystemProcessing => "system_processing",
            ErrorKind::DataExtraction => "data_extraction",
            ErrorKind::UnknownBaselineError => "unknown_baseline_error",
            ErrorKind::UnknownKognitosError => "unknown_kognitos_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "SUCCESS",
            RunStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A standardized structure for returning results from pipeline simulators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: RunStatus,
    pub error_details: Option<String>,
    pub error_type: Option<ErrorKind>,
    pub invoice_id: String,
    /// Audit seal over the transaction log. Always `None` for manual runs.
    pub merkle_root: Option<String>,
    /// Simulated elapsed time in real-world seconds.
    pub duration_secs: f64,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_deserializes_heterogeneous_json() {
        let record: InvoiceRecord = serde_json::from_str(
            r#"{"invoice_id": "abc", "quantity": 3, "unit_price": 10.5, "total": "31.50"}"#,
        )
        .unwrap();
        assert_eq!(
            record.get("invoice_id"),
            Some(&FieldValue::Str("abc".to_string()))
        );
        assert_eq!(record.get("quantity"), Some(&FieldValue::Int(3)));
        assert_eq!(record.get("unit_price"), Some(&FieldValue::Float(10.5)));
        assert_eq!(record.number("total"), Some(31.5));
    }

    #[test]
    fn as_number_rejects_garbage_text() {
        let value = FieldValue::Str("thirty".to_string());
        assert_eq!(
            value.as_number(),
            Err(FieldError::NotNumeric("thirty".to_string()))
        );
    }

    #[test]
    fn blank_detection_covers_absent_and_empty() {
        let mut record = InvoiceRecord::new();
        assert!(record.is_blank("invoice_id"));
        record.set("invoice_id", FieldValue::Str("  ".to_string()));
        assert!(record.is_blank("invoice_id"));
        record.set("invoice_id", FieldValue::Str("inv-1".to_string()));
        assert!(!record.is_blank("invoice_id"));
        record.set("quantity", FieldValue::Int(0));
        assert!(!record.is_blank("quantity"));
    }

    #[test]
    fn enums_render_their_wire_names() {
        assert_eq!(IssueCode::MissingInvoiceId.to_string(), "missing_invoice_id");
        assert_eq!(FixCode::RecalculatedTotal.to_string(), "recalculated_total");
        assert_eq!(
            ErrorKind::UnknownKognitosError.to_string(),
            "unknown_kognitos_error"
        );
        assert_eq!(RunStatus::Success.to_string(), "SUCCESS");
        let json = serde_json::to_string(&ErrorKind::DataExtraction).unwrap();
        assert_eq!(json, "\"data_extraction\"");
    }
}
