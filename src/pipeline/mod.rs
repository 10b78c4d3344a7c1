//! The two simulated invoice pipelines.
//!
//! Both are single-pass state machines and total functions from an invoice
//! source to an [`Outcome`](crate::domain::Outcome): every internal error is
//! folded into a failure outcome at the boundary, never propagated past it.

pub mod automated;
pub mod baseline;

pub use automated::run_automated_pipeline;
pub use baseline::run_baseline_pipeline;

use std::path::Path;
use std::time::Duration;

use crate::constants::{FAILED_ID_PREFIX, MINUTES_PER_HOUR};
use crate::loader;

/// Real-time delay standing in for `minutes` of simulated work, compressed
/// by the run's time scale (real-world hours represented per demo second).
pub(crate) async fn simulate_latency(minutes: f64, real_hours_per_demo_second: f64) {
    if real_hours_per_demo_second <= 0.0 || !minutes.is_finite() {
        return;
    }
    let secs = minutes / MINUTES_PER_HOUR / real_hours_per_demo_second;
    if secs > 0.0 && secs.is_finite() {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

/// Synthesized identifier for records whose own identifier cannot be
/// determined at all.
pub(crate) fn fallback_id(path: &Path) -> String {
    format!("{}{}", FAILED_ID_PREFIX, loader::source_name(path))
}
