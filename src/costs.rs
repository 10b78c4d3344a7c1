//! Cost attribution for benchmark runs: human time for the baseline,
//! machine time plus a per-run platform fee for the automated pipeline.

use serde::{Deserialize, Serialize};

use crate::constants::{BASELINE_RUN, SECONDS_PER_HOUR};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Blended hourly rate for an AP clerk.
    pub human_hourly_usd: f64,
    /// Generous hourly cost for compute.
    pub machine_hourly_usd: f64,
    /// Small fixed platform fee per automated run.
    pub automated_fee_per_run_usd: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            human_hourly_usd: 45.0,
            machine_hourly_usd: 0.50,
            automated_fee_per_run_usd: 0.001,
        }
    }
}

/// Cost of one run given its pipeline and simulated cycle time.
pub fn cost_for_run(run_type: &str, cycle_time_s: f64, rates: &CostRates) -> f64 {
    if run_type == BASELINE_RUN {
        cycle_time_s * rates.human_hourly_usd / SECONDS_PER_HOUR
    } else {
        cycle_time_s * rates.machine_hourly_usd / SECONDS_PER_HOUR
            + rates.automated_fee_per_run_usd
    }
}
