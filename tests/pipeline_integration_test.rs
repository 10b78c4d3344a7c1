use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use invoice_bench::config::BenchmarkConfig;
use invoice_bench::constants::{
    INVOICE_DATE, INVOICE_ID, QUANTITY, TOTAL, UNIT_PRICE, VENDOR_NAME,
};
use invoice_bench::domain::{ErrorKind, FieldValue, InvoiceRecord, IssueCode, Outcome, RunStatus};
use invoice_bench::generator;
use invoice_bench::loader;
use invoice_bench::pipeline::{run_automated_pipeline, run_baseline_pipeline};
use invoice_bench::quality::{detect_issues, remediate, FixPolicy};
use invoice_bench::rng::SimRng;

/// Default config with the time scale cranked up so simulated sleeps are
/// negligible in test runs.
fn fast_config() -> BenchmarkConfig {
    let mut config = BenchmarkConfig::default();
    config.run.real_hours_per_demo_second = 1_000_000.0;
    config
}

fn invoice(fields: &[(&str, FieldValue)]) -> InvoiceRecord {
    let mut record = InvoiceRecord::new();
    for (name, value) in fields {
        record.set(name, value.clone());
    }
    record
}

/// The end-to-end scenario record: clean except for an empty identifier.
fn missing_id_invoice() -> InvoiceRecord {
    invoice(&[
        (INVOICE_ID, FieldValue::Str(String::new())),
        (VENDOR_NAME, FieldValue::Str("Acme".to_string())),
        (INVOICE_DATE, FieldValue::Str("2025-07-15".to_string())),
        (QUANTITY, FieldValue::Int(3)),
        (UNIT_PRICE, FieldValue::Float(10.0)),
        (TOTAL, FieldValue::Float(30.0)),
    ])
}

fn clean_invoice() -> InvoiceRecord {
    let mut record = missing_id_invoice();
    record.set(INVOICE_ID, FieldValue::Str("inv-0001".to_string()));
    record
}

fn write_invoice(dir: &Path, name: &str, record: &InvoiceRecord) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(record)?)?;
    Ok(path)
}

#[tokio::test]
async fn baseline_pipeline_never_returns_a_merkle_root() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    let clean = write_invoice(dir.path(), "invoice_001.json", &clean_invoice())?;
    let broken = write_invoice(dir.path(), "invoice_002.json", &missing_id_invoice())?;

    for seed in 0..50 {
        let mut rng = SimRng::seeded(seed);
        let first = run_baseline_pipeline(&clean, &config, &mut rng).await;
        let second = run_baseline_pipeline(&broken, &config, &mut rng).await;
        assert!(first.merkle_root.is_none());
        assert!(second.merkle_root.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn automated_failure_still_seals_the_audit_trail() -> Result<()> {
    let dir = tempdir()?;
    let mut config = fast_config();
    // Remediation never succeeds, so the empty identifier survives and the
    // execution step must reject the record.
    config.fix_policy = FixPolicy {
        generate_invoice_id: 0.0,
        repair_date: 0.0,
        fix_negative_quantity: 0.0,
        repair_total: 0.0,
        fill_quantity: 0.0,
        fill_unit_price: 0.0,
        recalculate_total: 0.0,
        default_vendor_name: 0.0,
    };
    let path = write_invoice(dir.path(), "invoice_001.json", &missing_id_invoice())?;

    for seed in 0..20 {
        let mut rng = SimRng::seeded(seed);
        let outcome = run_automated_pipeline(&path, &config, &mut rng).await;
        assert_eq!(outcome.status, RunStatus::Failure);
        assert_eq!(outcome.error_type, Some(ErrorKind::DataExtraction));
        assert!(outcome
            .error_details
            .as_deref()
            .unwrap()
            .contains("unprocessable_input_format"));
        // The log holds at least the start marker, so the seal exists.
        assert!(outcome.merkle_root.is_some());
    }
    Ok(())
}

#[test]
fn remediator_generates_an_identifier_with_high_frequency() {
    let record = missing_id_invoice();
    let policy = FixPolicy::default();
    assert_eq!(detect_issues(&record), vec![IssueCode::MissingInvoiceId]);

    let trials = 400u64;
    let mut generated = 0u64;
    for seed in 0..trials {
        // Independently reseeded trials.
        let mut rng = SimRng::seeded(seed);
        let (repaired, _fixes) = remediate(&record, &mut rng, &policy);
        if !repaired.is_blank(INVOICE_ID) {
            generated += 1;
        }
    }
    // Configured at 95%; allow generous statistical tolerance.
    assert!(
        generated >= 360 && generated < trials,
        "generated {generated}/{trials} identifiers"
    );
}

#[tokio::test]
async fn automated_pipeline_repairs_a_missing_id_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    let path = write_invoice(dir.path(), "invoice_001.json", &missing_id_invoice())?;

    let trials = 100;
    let mut successes = 0;
    for seed in 0..trials {
        let mut rng = SimRng::seeded(seed);
        let outcome = run_automated_pipeline(&path, &config, &mut rng).await;
        // Sealed on success and on every failure path alike.
        assert!(outcome.merkle_root.is_some());
        if outcome.is_success() {
            assert!(!outcome.invoice_id.is_empty());
            assert_ne!(outcome.invoice_id, "UNKNOWN");
            successes += 1;
        }
    }
    // ~95% id fix rate times ~99.5% processing survival.
    assert!(successes >= 85, "only {successes}/{trials} succeeded");
    Ok(())
}

#[tokio::test]
async fn clean_invoices_flow_through_the_automated_pipeline() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    let path = write_invoice(dir.path(), "invoice_001.json", &clean_invoice())?;

    let mut successes = 0;
    for seed in 0..50 {
        let mut rng = SimRng::seeded(seed);
        let outcome = run_automated_pipeline(&path, &config, &mut rng).await;
        assert!(outcome.merkle_root.is_some());
        if outcome.is_success() {
            assert_eq!(outcome.invoice_id, "inv-0001");
            assert!(outcome.error_details.is_none());
            successes += 1;
        } else {
            // The only way a clean record fails is the base processing rate.
            assert_eq!(outcome.error_type, Some(ErrorKind::SystemProcessing));
        }
    }
    assert!(successes >= 45, "only {successes}/50 succeeded");
    Ok(())
}

#[tokio::test]
async fn manual_failure_rate_tracks_the_issue_formula() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    // One detectable issue: negative quantity (the totals stay consistent).
    let record = invoice(&[
        (INVOICE_ID, FieldValue::Str("inv-0001".to_string())),
        (VENDOR_NAME, FieldValue::Str("Acme".to_string())),
        (INVOICE_DATE, FieldValue::Str("2025-07-15".to_string())),
        (QUANTITY, FieldValue::Int(-2)),
        (UNIT_PRICE, FieldValue::Float(10.0)),
        (TOTAL, FieldValue::Float(-20.0)),
    ]);
    assert_eq!(detect_issues(&record), vec![IssueCode::NegativeQuantity]);
    let path = write_invoice(dir.path(), "invoice_001.json", &record)?;

    let trials = 1500;
    let mut failures = 0;
    for seed in 0..trials {
        let mut rng = SimRng::seeded(seed);
        let outcome = run_baseline_pipeline(&path, &config, &mut rng).await;
        if !outcome.is_success() {
            failures += 1;
        }
    }

    // Dynamic rate: 0.07 base + 0.35 per issue = 0.42, plus the residual 1%
    // operational rate on surviving draws (~0.426 overall).
    let observed = failures as f64 / trials as f64;
    assert!(
        (0.37..=0.48).contains(&observed),
        "observed failure rate {observed}"
    );
    Ok(())
}

#[tokio::test]
async fn unreadable_records_fold_into_unknown_errors() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    let path = dir.path().join("invoice_bad.json");
    fs::write(&path, "not json at all")?;

    let mut rng = SimRng::seeded(42);
    let baseline = run_baseline_pipeline(&path, &config, &mut rng).await;
    assert_eq!(baseline.status, RunStatus::Failure);
    assert_eq!(baseline.error_type, Some(ErrorKind::UnknownBaselineError));
    assert_eq!(baseline.invoice_id, "failed_invoice_bad.json");
    assert_eq!(baseline.duration_secs, 0.0);
    assert!(baseline.merkle_root.is_none());

    let automated = run_automated_pipeline(&path, &config, &mut rng).await;
    assert_eq!(automated.status, RunStatus::Failure);
    assert_eq!(automated.error_type, Some(ErrorKind::UnknownKognitosError));
    assert_eq!(automated.invoice_id, "failed_invoice_bad.json");
    // The start marker was logged before the read, so partial audit
    // evidence survives even here.
    assert!(automated.merkle_root.is_some());
    Ok(())
}

#[tokio::test]
async fn a_fixed_seed_reproduces_the_whole_benchmark() -> Result<()> {
    let dir = tempdir()?;
    let config = fast_config();
    let mut corpus_rng = SimRng::seeded(7);
    generator::generate_corpus(dir.path(), 6, 0.5, &mut corpus_rng)?;
    let invoices = loader::list_invoices(dir.path())?;
    assert_eq!(invoices.len(), 6);

    async fn run_all(
        invoices: &[PathBuf],
        config: &BenchmarkConfig,
        seed: u64,
    ) -> Vec<Outcome> {
        let mut rng = SimRng::seeded(seed);
        let mut outcomes = Vec::new();
        for path in invoices {
            outcomes.push(run_baseline_pipeline(path, config, &mut rng).await);
        }
        for path in invoices {
            outcomes.push(run_automated_pipeline(path, config, &mut rng).await);
        }
        outcomes
    }

    let first = run_all(&invoices, &config, 42).await;
    let second = run_all(&invoices, &config, 42).await;
    assert_eq!(first, second);

    let other_seed = run_all(&invoices, &config, 43).await;
    assert_ne!(first, other_seed);
    Ok(())
}
