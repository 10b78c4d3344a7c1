use crate::constants::{INVOICE_DATE, INVOICE_ID, QUANTITY, TOTAL, UNIT_PRICE};
use crate::domain::{FieldValue, InvoiceRecord, IssueCode};

/// Tolerance when comparing `quantity * unit_price` against the stated total.
const TOTAL_TOLERANCE: f64 = 0.01;

/// Runs every data-quality check against a record, in a fixed order.
///
/// Total and deterministic: absent or malformed fields are findings, never
/// errors, and re-running on an unchanged record yields the identical list.
pub fn detect_issues(record: &InvoiceRecord) -> Vec<IssueCode> {
    let mut issues = Vec::new();

    if record.is_blank(INVOICE_ID) {
        issues.push(IssueCode::MissingInvoiceId);
    }

    if let Some(value) = record.get(INVOICE_DATE) {
        if !has_canonical_date_shape(value) {
            issues.push(IssueCode::InvalidDateFormat);
        }
    }

    if let Some(quantity) = record.number(QUANTITY) {
        if quantity < 0.0 {
            issues.push(IssueCode::NegativeQuantity);
        }
    }

    if let Some(FieldValue::Str(raw)) = record.get(TOTAL) {
        if !is_numeric_after_currency_strip(raw) {
            issues.push(IssueCode::NonNumericTotal);
        }
    }

    if record.get(QUANTITY).is_none() || record.get(UNIT_PRICE).is_none() {
        issues.push(IssueCode::MissingRequiredFields);
    }

    if let (Some(quantity), Some(unit_price), Some(total)) = (
        record.number(QUANTITY),
        record.number(UNIT_PRICE),
        record.number(TOTAL),
    ) {
        if (quantity * unit_price - total).abs() > TOTAL_TOLERANCE {
            issues.push(IssueCode::MismatchedTotal);
        }
    }

    issues
}

/// Shape check for the canonical `YYYY-MM-DD` form: exactly 10 bytes with
/// separators at positions 4 and 7. Not calendar validation.
pub(crate) fn has_canonical_date_shape(value: &FieldValue) -> bool {
    match value {
        FieldValue::Str(s) => {
            let bytes = s.as_bytes();
            bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
        }
        _ => false,
    }
}

/// True when the string parses as a number once a trailing currency marker
/// ("$", "USD", ...) is stripped.
pub(crate) fn is_numeric_after_currency_strip(raw: &str) -> bool {
    let stripped = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || matches!(c, '$' | '€' | '£'))
        .trim_end();
    !stripped.is_empty() && stripped.parse::<f64>().is_ok()
}
