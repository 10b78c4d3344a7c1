//! Simple metrics module for the benchmark engine
//!
//! This module provides a straightforward API for recording metrics using
//! the standard Prometheus naming conventions.

use std::fmt;
use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Pipeline run metrics
    RunsSuccess,
    RunsFailure,
    CycleTimeSeconds,
    RunCostUsd,

    // Quality metrics
    IssuesDetected,
    FixesApplied,

    // Audit chain metrics
    AuditRootsSealed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RunsSuccess => "invoice_bench_runs_success_total",
            MetricName::RunsFailure => "invoice_bench_runs_failure_total",
            MetricName::CycleTimeSeconds => "invoice_bench_cycle_time_seconds",
            MetricName::RunCostUsd => "invoice_bench_run_cost_usd",
            MetricName::IssuesDetected => "invoice_bench_issues_detected_total",
            MetricName::FixesApplied => "invoice_bench_fixes_applied_total",
            MetricName::AuditRootsSealed => "invoice_bench_audit_roots_sealed_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics system. Safe to call once at startup; a second
/// call is a no-op because the global recorder is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Render the current metric values in Prometheus exposition format.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Pipeline Run Metrics
// ============================================================================

pub mod runs {
    use super::MetricName;

    /// Record a successful run for a pipeline.
    pub fn success(run_type: &str) {
        ::metrics::counter!(
            MetricName::RunsSuccess.as_str(),
            "run_type" => run_type.to_string()
        )
        .increment(1);
    }

    /// Record a failed run, labelled by pipeline and error taxonomy.
    pub fn failure(run_type: &str, error_type: &str) {
        ::metrics::counter!(
            MetricName::RunsFailure.as_str(),
            "run_type" => run_type.to_string(),
            "error_type" => error_type.to_string()
        )
        .increment(1);
    }

    /// Record the simulated cycle time of a run.
    pub fn cycle_time(run_type: &str, secs: f64) {
        ::metrics::histogram!(
            MetricName::CycleTimeSeconds.as_str(),
            "run_type" => run_type.to_string()
        )
        .record(secs);
    }

    /// Record the attributed cost of a run.
    pub fn cost(run_type: &str, usd: f64) {
        ::metrics::histogram!(
            MetricName::RunCostUsd.as_str(),
            "run_type" => run_type.to_string()
        )
        .record(usd);
    }
}

// ============================================================================
// Quality Metrics
// ============================================================================

pub mod quality {
    use super::MetricName;

    /// Record one detected data-quality issue.
    pub fn issue_detected(code: &str) {
        ::metrics::counter!(
            MetricName::IssuesDetected.as_str(),
            "issue" => code.to_string()
        )
        .increment(1);
    }

    /// Record one successfully applied fix.
    pub fn fix_applied(code: &str) {
        ::metrics::counter!(
            MetricName::FixesApplied.as_str(),
            "fix" => code.to_string()
        )
        .increment(1);
    }
}

// ============================================================================
// Audit Chain Metrics
// ============================================================================

pub mod auditing {
    use super::MetricName;

    /// Record one Merkle root sealed over a transaction log.
    pub fn root_sealed() {
        ::metrics::counter!(MetricName::AuditRootsSealed.as_str()).increment(1);
    }
}
