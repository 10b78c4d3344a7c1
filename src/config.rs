use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::costs::CostRates;
use crate::error::{BenchError, Result};
use crate::quality::FixPolicy;

/// Timing windows for the two pipelines, in simulated minutes per invoice.
/// Manual timing follows the industry average of roughly 12 minutes per
/// manually keyed invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub manual_sleep_min_minutes: f64,
    pub manual_sleep_max_minutes: f64,
    pub automated_sleep_min_minutes: f64,
    pub automated_sleep_max_minutes: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            manual_sleep_min_minutes: 6.0,
            manual_sleep_max_minutes: 14.0,
            automated_sleep_min_minutes: 0.6,
            automated_sleep_max_minutes: 1.5,
        }
    }
}

/// Error injection rates. The per-issue terms are added to the base rate
/// once per detected (manual) or remaining (automated) issue; the combined
/// rate may exceed 1.0, which simply means the run always fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorRates {
    pub manual_base: f64,
    pub manual_per_issue: f64,
    pub manual_operational: f64,
    pub automated_base: f64,
    pub automated_per_issue: f64,
}

impl Default for ErrorRates {
    fn default() -> Self {
        Self {
            manual_base: 0.07,
            manual_per_issue: 0.35,
            manual_operational: 0.01,
            automated_base: 0.005,
            automated_per_issue: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Real-world hours represented per demo second; higher compresses the
    /// simulated sleeps further.
    pub real_hours_per_demo_second: f64,
    /// Seed for reproducible runs; unset means entropy-seeded.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            real_hours_per_demo_second: 60.0,
            seed: Some(42),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub timing: TimingConfig,
    pub error_rates: ErrorRates,
    pub fix_policy: FixPolicy,
    pub costs: CostRates,
    pub run: RunConfig,
}

impl BenchmarkConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BenchError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: BenchmarkConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the config file when it exists, falling back to defaults so a
    /// fresh checkout runs without any setup.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
