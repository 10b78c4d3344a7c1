//! Synthetic corpus generation: mostly clean invoices plus a configurable
//! share of "monster" invoices carrying one realistic defect each, to
//! exercise the inspectors and remediators downstream.

use std::fs;
use std::path::Path;

use crate::constants::{
    INVOICE_DATE, INVOICE_ID, NOTES, QUANTITY, TOTAL, UNIT_PRICE, VENDOR_NAME,
};
use crate::domain::{FieldValue, InvoiceRecord};
use crate::error::Result;
use crate::rng::SimRng;

pub const VENDORS: &[&str] = &[
    "Stark Industries",
    "Wayne Enterprises",
    "Cyberdyne Systems",
    "Acme Corp",
    "Soylent Corp",
];

enum Chaos {
    MissingId,
    BadDate,
    NegativeQuantity,
    ExtraNotes,
}

/// Writes `count` invoice JSON files into `dir`, `monster_pct` of them with
/// an injected defect. Returns the number of files written.
pub fn generate_corpus(
    dir: &Path,
    count: usize,
    monster_pct: f64,
    rng: &mut SimRng,
) -> Result<usize> {
    fs::create_dir_all(dir)?;

    let monsters = (count as f64 * monster_pct.clamp(0.0, 1.0)) as usize;
    let mut flags = vec![true; monsters];
    flags.extend(vec![false; count - monsters]);
    rng.shuffle(&mut flags);

    for (index, is_monster) in flags.iter().enumerate() {
        let record = synth_invoice(*is_monster, rng);
        let path = dir.join(format!("invoice_{:03}.json", index + 1));
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
    }

    Ok(count)
}

fn synth_invoice(is_monster: bool, rng: &mut SimRng) -> InvoiceRecord {
    let quantity = rng.int_in(1, 10);
    let unit_price = round_cents(rng.uniform(20.0, 500.0));
    let total = round_cents(quantity as f64 * unit_price);

    let mut record = InvoiceRecord::new();
    record.set(INVOICE_ID, FieldValue::Str(rng.uuid().to_string()));
    record.set(
        VENDOR_NAME,
        FieldValue::Str(
            rng.pick(VENDORS)
                .copied()
                .unwrap_or("Acme Corp")
                .to_string(),
        ),
    );
    record.set(
        INVOICE_DATE,
        FieldValue::Str(format!("2025-07-{:02}", rng.int_in(10, 25))),
    );
    record.set(QUANTITY, FieldValue::Int(quantity));
    record.set(UNIT_PRICE, FieldValue::Float(unit_price));
    record.set(TOTAL, FieldValue::Float(total));

    if is_monster {
        match chaos_kind(rng) {
            Chaos::MissingId => {
                record.set(INVOICE_ID, FieldValue::Str(String::new()));
            }
            Chaos::BadDate => {
                record.set(
                    INVOICE_DATE,
                    FieldValue::Str(format!(
                        "{}-{}-2025",
                        rng.int_in(1, 12),
                        rng.int_in(1, 28)
                    )),
                );
            }
            Chaos::NegativeQuantity => {
                record.set(QUANTITY, FieldValue::Int(-quantity));
                record.set(TOTAL, FieldValue::Float(-total));
            }
            Chaos::ExtraNotes => {
                record.set(NOTES, FieldValue::Str("Urgent payment required".to_string()));
            }
        }
    }

    record
}

fn chaos_kind(rng: &mut SimRng) -> Chaos {
    match rng.int_in(0, 3) {
        0 => Chaos::MissingId,
        1 => Chaos::BadDate,
        2 => Chaos::NegativeQuantity,
        _ => Chaos::ExtraNotes,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use crate::quality::detect_issues;

    #[test]
    fn writes_the_requested_number_of_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = SimRng::seeded(7);
        let written = generate_corpus(dir.path(), 10, 0.2, &mut rng).unwrap();
        assert_eq!(written, 10);

        let paths = loader::list_invoices(dir.path()).unwrap();
        assert_eq!(paths.len(), 10);
    }

    #[test]
    fn clean_invoices_pass_inspection() {
        let mut rng = SimRng::seeded(7);
        for _ in 0..20 {
            let record = synth_invoice(false, &mut rng);
            assert!(detect_issues(&record).is_empty());
        }
    }

    #[test]
    fn monster_invoices_are_loadable_and_mostly_defective() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = SimRng::seeded(11);
        generate_corpus(dir.path(), 30, 1.0, &mut rng).unwrap();

        let mut defective = 0;
        for path in loader::list_invoices(dir.path()).unwrap() {
            let record = loader::load_invoice(&path).unwrap();
            if !detect_issues(&record).is_empty() {
                defective += 1;
            }
        }
        // The extra-notes chaos leaves a record inspection-clean, so not
        // every monster carries a detectable defect.
        assert!(defective > 10);
    }

    #[test]
    fn generation_is_reproducible_for_a_fixed_seed() {
        let mut a = SimRng::seeded(42);
        let mut b = SimRng::seeded(42);
        for _ in 0..10 {
            assert_eq!(synth_invoice(true, &mut a), synth_invoice(true, &mut b));
        }
    }
}
