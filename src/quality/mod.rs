//! Data-quality checkpoint for invoice records: a pure inspector that
//! enumerates defects in a fixed order, and a probabilistic remediator that
//! repairs them on a copy of the record.

pub mod inspector;
pub mod remediator;

pub use inspector::detect_issues;
pub use remediator::{remediate, FixPolicy};
