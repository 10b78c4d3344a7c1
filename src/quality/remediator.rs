use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ALTERNATE_DATE_FORMATS, DEFAULT_DATE, DEFAULT_QUANTITY, DEFAULT_UNIT_PRICE, DEFAULT_VENDOR,
    INVOICE_DATE, INVOICE_ID, QUANTITY, TOTAL, UNIT_PRICE, VENDOR_NAME,
};
use crate::domain::{FieldValue, FixCode, InvoiceRecord};
use crate::quality::inspector::{has_canonical_date_shape, is_numeric_after_currency_strip};
use crate::rng::SimRng;

static NUMERIC_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("numeric fragment regex"));

/// Per-fix success probabilities.
///
/// Each repair attempt is gated by one independent draw against its
/// probability. The values are a tunable policy, not a hard law; they can be
/// overridden from the benchmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixPolicy {
    pub generate_invoice_id: f64,
    pub repair_date: f64,
    pub fix_negative_quantity: f64,
    pub repair_total: f64,
    pub fill_quantity: f64,
    pub fill_unit_price: f64,
    pub recalculate_total: f64,
    pub default_vendor_name: f64,
}

impl Default for FixPolicy {
    fn default() -> Self {
        Self {
            generate_invoice_id: 0.95,
            repair_date: 0.90,
            fix_negative_quantity: 0.95,
            repair_total: 0.85,
            fill_quantity: 0.90,
            fill_unit_price: 0.90,
            recalculate_total: 0.80,
            default_vendor_name: 0.95,
        }
    }
}

/// Attempts every applicable repair on a copy of the record, in a fixed
/// order. The original record is untouched.
///
/// A draw is consumed only when a repair's precondition holds; a failed draw
/// leaves the field exactly as it was and its fix code is omitted. Applied
/// fix codes are returned in attempt order for the transaction log.
pub fn remediate(
    record: &InvoiceRecord,
    rng: &mut SimRng,
    policy: &FixPolicy,
) -> (InvoiceRecord, Vec<FixCode>) {
    let mut repaired = record.clone();
    let mut fixes = Vec::new();

    if repaired.is_blank(INVOICE_ID) && rng.chance(policy.generate_invoice_id) {
        let id = rng.uuid().to_string();
        repaired.set(INVOICE_ID, FieldValue::Str(id));
        fixes.push(FixCode::GeneratedInvoiceId);
    }

    let bad_date = match repaired.get(INVOICE_DATE) {
        Some(value) if !has_canonical_date_shape(value) => Some(value.to_string()),
        _ => None,
    };
    if let Some(raw) = bad_date {
        if rng.chance(policy.repair_date) {
            match reparse_date(&raw) {
                Some(canonical) => {
                    repaired.set(INVOICE_DATE, FieldValue::Str(canonical));
                    fixes.push(FixCode::FixedDateFormat);
                }
                None => {
                    repaired.set(INVOICE_DATE, FieldValue::Str(DEFAULT_DATE.to_string()));
                    fixes.push(FixCode::DefaultedDate);
                }
            }
        }
    }

    let negative_fix = match repaired.get(QUANTITY) {
        Some(value) if value.as_number().map_or(false, |q| q < 0.0) => Some(absolute(value)),
        _ => None,
    };
    if let Some(fixed) = negative_fix {
        if rng.chance(policy.fix_negative_quantity) {
            repaired.set(QUANTITY, fixed);
            fixes.push(FixCode::FixedNegativeQuantity);
        }
    }

    let bad_total = match repaired.get(TOTAL) {
        Some(FieldValue::Str(raw)) if !is_numeric_after_currency_strip(raw) => Some(raw.clone()),
        _ => None,
    };
    if let Some(raw) = bad_total {
        if rng.chance(policy.repair_total) {
            if let Some(extracted) = first_numeric_fragment(&raw) {
                repaired.set(TOTAL, FieldValue::Float(extracted));
                fixes.push(FixCode::ExtractedNumericTotal);
            } else if let (Some(quantity), Some(unit_price)) =
                (repaired.number(QUANTITY), repaired.number(UNIT_PRICE))
            {
                repaired.set(TOTAL, FieldValue::Float(quantity * unit_price));
                fixes.push(FixCode::InferredTotalFromFields);
            }
        }
    }

    if repaired.get(QUANTITY).is_none() && rng.chance(policy.fill_quantity) {
        let inferred = match (repaired.number(TOTAL), repaired.number(UNIT_PRICE)) {
            (Some(total), Some(unit_price)) if unit_price.abs() > f64::EPSILON => {
                Some(((total / unit_price).round() as i64).max(1))
            }
            _ => None,
        };
        match inferred {
            Some(quantity) => {
                repaired.set(QUANTITY, FieldValue::Int(quantity));
                fixes.push(FixCode::InferredQuantityFromTotal);
            }
            None => {
                repaired.set(QUANTITY, FieldValue::Int(DEFAULT_QUANTITY));
                fixes.push(FixCode::DefaultedQuantity);
            }
        }
    }

    if repaired.get(UNIT_PRICE).is_none() && rng.chance(policy.fill_unit_price) {
        let inferred = match (repaired.number(TOTAL), repaired.number(QUANTITY)) {
            (Some(total), Some(quantity)) if quantity.abs() > f64::EPSILON => {
                Some(total / quantity)
            }
            _ => None,
        };
        match inferred {
            Some(unit_price) => {
                repaired.set(UNIT_PRICE, FieldValue::Float(unit_price));
                fixes.push(FixCode::InferredUnitPriceFromTotal);
            }
            None => {
                repaired.set(UNIT_PRICE, FieldValue::Float(DEFAULT_UNIT_PRICE));
                fixes.push(FixCode::DefaultedUnitPrice);
            }
        }
    }

    let mismatch = match (
        repaired.number(QUANTITY),
        repaired.number(UNIT_PRICE),
        repaired.number(TOTAL),
    ) {
        (Some(quantity), Some(unit_price), Some(total))
            if (quantity * unit_price - total).abs() > 0.01 =>
        {
            Some(quantity * unit_price)
        }
        _ => None,
    };
    if let Some(product) = mismatch {
        if rng.chance(policy.recalculate_total) {
            repaired.set(TOTAL, FieldValue::Float(product));
            fixes.push(FixCode::RecalculatedTotal);
        }
    }

    if repaired.is_blank(VENDOR_NAME) && rng.chance(policy.default_vendor_name) {
        repaired.set(VENDOR_NAME, FieldValue::Str(DEFAULT_VENDOR.to_string()));
        fixes.push(FixCode::DefaultedVendorName);
    }

    (repaired, fixes)
}

/// Tries each known alternate format in order and reformats the first match
/// to canonical `YYYY-MM-DD`.
fn reparse_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    for format in ALTERNATE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

fn first_numeric_fragment(raw: &str) -> Option<f64> {
    NUMERIC_FRAGMENT
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn absolute(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Int(i) => FieldValue::Int(i.abs()),
        FieldValue::Float(f) => FieldValue::Float(f.abs()),
        FieldValue::Str(s) => FieldValue::Str(s.trim().trim_start_matches('-').to_string()),
    }
}
