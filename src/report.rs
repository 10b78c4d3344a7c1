//! Aggregate KPI computation and markdown rendering for completed
//! benchmarks.

use crate::constants::{AUTOMATED_RUN, BASELINE_RUN};
use crate::domain::RunStatus;
use crate::ledger::RunRecord;

/// Aggregate statistics for one pipeline across a benchmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub total_runs: usize,
    pub successful_runs: usize,
    pub avg_cycle_time_s: f64,
    pub avg_cost_usd: f64,
    pub error_rate_pct: f64,
}

impl PipelineSummary {
    fn from_runs(runs: &[&RunRecord]) -> Self {
        let total_runs = runs.len();
        if total_runs == 0 {
            return Self::default();
        }
        let successful_runs = runs
            .iter()
            .filter(|r| r.status == RunStatus::Success.as_str())
            .count();
        let avg_cycle_time_s =
            runs.iter().map(|r| r.cycle_time_s).sum::<f64>() / total_runs as f64;
        let avg_cost_usd = runs.iter().map(|r| r.cost_usd).sum::<f64>() / total_runs as f64;
        let error_rate_pct =
            (total_runs - successful_runs) as f64 / total_runs as f64 * 100.0;
        Self {
            total_runs,
            successful_runs,
            avg_cycle_time_s,
            avg_cost_usd,
            error_rate_pct,
        }
    }
}

/// The two pipeline summaries side by side, plus delta helpers.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkReport {
    pub baseline: PipelineSummary,
    pub automated: PipelineSummary,
}

pub fn summarize(runs: &[RunRecord]) -> BenchmarkReport {
    let baseline: Vec<&RunRecord> = runs.iter().filter(|r| r.run_type == BASELINE_RUN).collect();
    let automated: Vec<&RunRecord> =
        runs.iter().filter(|r| r.run_type == AUTOMATED_RUN).collect();
    BenchmarkReport {
        baseline: PipelineSummary::from_runs(&baseline),
        automated: PipelineSummary::from_runs(&automated),
    }
}

impl BenchmarkReport {
    /// Percentage change in average cycle time, baseline → automated.
    pub fn time_delta_pct(&self) -> f64 {
        percent_change(self.baseline.avg_cycle_time_s, self.automated.avg_cycle_time_s)
    }

    /// Percentage change in average cost, baseline → automated.
    pub fn cost_delta_pct(&self) -> f64 {
        percent_change(self.baseline.avg_cost_usd, self.automated.avg_cost_usd)
    }

    /// Percentage change in error rate. A baseline without errors reports
    /// -100% when the automated pipeline is also clean, 0% otherwise.
    pub fn error_delta_pct(&self) -> f64 {
        if self.baseline.error_rate_pct > 0.0 {
            percent_change(self.baseline.error_rate_pct, self.automated.error_rate_pct)
        } else if self.automated.error_rate_pct == 0.0 {
            -100.0
        } else {
            0.0
        }
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("\n--- Invoice Automation Benchmark: Final Report ---\n\n");
        out.push_str("| Metric              | Baseline   | Automated  | Delta      |\n");
        out.push_str("|---------------------|------------|------------|------------|\n");
        out.push_str(&format!(
            "| Avg Cycle Time (s)  | {:<10.2} | {:<10.2} | {:<9.2}% |\n",
            self.baseline.avg_cycle_time_s,
            self.automated.avg_cycle_time_s,
            self.time_delta_pct()
        ));
        out.push_str(&format!(
            "| Avg Cost ($)        | {:<10.4} | {:<10.4} | {:<9.2}% |\n",
            self.baseline.avg_cost_usd,
            self.automated.avg_cost_usd,
            self.cost_delta_pct()
        ));
        out.push_str(&format!(
            "| Error Rate (%)      | {:<10.2} | {:<10.2} | {:<9.2}% |\n",
            self.baseline.error_rate_pct,
            self.automated.error_rate_pct,
            self.error_delta_pct()
        ));
        out.push_str(&format!(
            "| Total Runs          | {:<10} | {:<10} |            |\n",
            self.baseline.total_runs, self.automated.total_runs
        ));
        out.push_str(&format!(
            "| Successful Runs     | {:<10} | {:<10} |            |\n",
            self.baseline.successful_runs, self.automated.successful_runs
        ));
        out.push_str("\n--- End of Report ---\n");
        out
    }
}

fn percent_change(baseline: f64, automated: f64) -> f64 {
    let denominator = if baseline == 0.0 { 1.0 } else { baseline };
    (automated - denominator) / denominator * 100.0
}
