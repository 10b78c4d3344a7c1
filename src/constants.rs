/// Field name constants to ensure consistency across the codebase.
/// The generator, loader, inspector, and remediator all address invoice
/// fields through these names.

// Invoice field names
pub const INVOICE_ID: &str = "invoice_id";
pub const VENDOR_NAME: &str = "vendor_name";
pub const INVOICE_DATE: &str = "invoice_date";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const TOTAL: &str = "total";
pub const NOTES: &str = "notes";

// Run types recorded in the ledger
pub const BASELINE_RUN: &str = "baseline";
pub const AUTOMATED_RUN: &str = "kognitos";

/// Identifier reported when the field is absent from a record entirely.
pub const UNKNOWN_ID: &str = "UNKNOWN";

/// Prefix for synthesized identifiers when a record cannot be read at all.
pub const FAILED_ID_PREFIX: &str = "failed_";

// Fallback values applied by the remediator
pub const DEFAULT_DATE: &str = "2025-01-01";
pub const DEFAULT_VENDOR: &str = "Unknown Vendor";
pub const DEFAULT_UNIT_PRICE: f64 = 1.0;
pub const DEFAULT_QUANTITY: i64 = 1;

/// Alternate date formats the remediator tries, in order, before falling
/// back to [`DEFAULT_DATE`]. First match wins.
pub const ALTERNATE_DATE_FORMATS: &[&str] = &[
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

pub const MINUTES_PER_HOUR: f64 = 60.0;
pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;
