//! The manual ("baseline") pipeline: slow, error-prone, and unaudited.

use std::path::Path;

use tracing::debug;

use crate::config::BenchmarkConfig;
use crate::constants::{INVOICE_ID, SECONDS_PER_MINUTE, UNKNOWN_ID};
use crate::domain::{ErrorKind, Outcome, RunStatus};
use crate::error::Result;
use crate::loader;
use crate::observability::metrics;
use crate::pipeline::{fallback_id, simulate_latency};
use crate::quality::detect_issues;
use crate::rng::SimRng;

/// Simulates one manual pass over an invoice: a clerk reads the record,
/// spends several simulated minutes on it, and mis-keys it with a
/// probability that grows with the record's data-quality issues.
///
/// Never produces a Merkle root. Unexpected errors become
/// `unknown_baseline_error` failures with zero simulated duration.
pub async fn run_baseline_pipeline(
    path: &Path,
    config: &BenchmarkConfig,
    rng: &mut SimRng,
) -> Outcome {
    match baseline_inner(path, config, rng).await {
        Ok(outcome) => outcome,
        Err(err) => Outcome {
            status: RunStatus::Failure,
            error_details: Some(err.to_string()),
            error_type: Some(ErrorKind::UnknownBaselineError),
            invoice_id: fallback_id(path),
            merkle_root: None,
            duration_secs: 0.0,
        },
    }
}

async fn baseline_inner(
    path: &Path,
    config: &BenchmarkConfig,
    rng: &mut SimRng,
) -> Result<Outcome> {
    let record = loader::load_invoice(path)?;
    let invoice_id = record
        .display(INVOICE_ID)
        .unwrap_or_else(|| UNKNOWN_ID.to_string());

    // Simulated clerk time: first draw of the invocation.
    let minutes = rng.uniform(
        config.timing.manual_sleep_min_minutes,
        config.timing.manual_sleep_max_minutes,
    );
    simulate_latency(minutes, config.run.real_hours_per_demo_second).await;
    let duration_secs = minutes * SECONDS_PER_MINUTE;

    let issues = detect_issues(&record);
    for issue in &issues {
        metrics::quality::issue_detected(issue.as_str());
    }

    // The clerk stumbles over each defect independently of the inherent
    // base error rate; the combined rate may exceed 1.0.
    let failure_rate =
        config.error_rates.manual_base + config.error_rates.manual_per_issue * issues.len() as f64;
    debug!(
        invoice_id = %invoice_id,
        issues = issues.len(),
        failure_rate,
        "manual pass"
    );

    if rng.draw() < failure_rate {
        let detail = if issues.is_empty() {
            "Manual data entry error: incorrect total.".to_string()
        } else {
            let named: Vec<&str> = issues.iter().map(|i| i.as_str()).collect();
            format!("Manual data entry error: {}", named.join(", "))
        };
        return Ok(failure(detail, ErrorKind::DataQuality, invoice_id, duration_secs));
    }

    if record.is_blank(INVOICE_ID) {
        return Ok(failure(
            "Manual validation error: missing invoice ID.".to_string(),
            ErrorKind::DataQuality,
            invoice_id,
            duration_secs,
        ));
    }

    if rng.draw() < config.error_rates.manual_operational {
        return Ok(failure(
            "Manual operational error: payment misrouting or delay.".to_string(),
            ErrorKind::SystemOperational,
            invoice_id,
            duration_secs,
        ));
    }

    Ok(Outcome {
        status: RunStatus::Success,
        error_details: None,
        error_type: None,
        invoice_id,
        merkle_root: None,
        duration_secs,
    })
}

fn failure(detail: String, kind: ErrorKind, invoice_id: String, duration_secs: f64) -> Outcome {
    Outcome {
        status: RunStatus::Failure,
        error_details: Some(detail),
        error_type: Some(kind),
        invoice_id,
        merkle_root: None,
        duration_secs,
    }
}
