// ── batch.rs ───────────────────────────────────────────────────────────────
// Runs N independent droplet simulations sequentially against one field.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::droplet::simulate_one;
use crate::error::ErosionError;
use crate::heightfield::Heightfield;
use crate::params::ErosionParameters;

/// Result of one `run_batch` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    /// Number of droplets actually simulated (may be less than requested
    /// if the batch was cancelled).
    pub droplets_run: u32,
    pub wall_time: Duration,
    pub cancelled: bool,
    /// Droplets that hit the numeric-overflow guard and terminated early.
    /// Never fatal to the field; purely informational.
    pub degenerate_droplets: u32,
}

/// Runs `n` droplet simulations against `field` in strict sequence — each
/// droplet sees every mutation of all prior droplets in the batch, so two
/// batches with identical `(seed, params, n, starting field)` and RNG
/// stream produce bit-identical ending fields.
///
/// Validates `params` before touching the field; returns `InvalidParameter`
/// and leaves `field` untouched if validation fails.
pub fn run_batch(
    field: &mut Heightfield,
    params: &ErosionParameters,
    rng: &mut impl Rng,
    n: u32,
) -> Result<BatchReport, ErosionError> {
    run_batch_cancellable(field, params, rng, n, || false)
}

/// As `run_batch`, but polls `should_cancel` between droplets (never
/// mid-droplet). If it returns `true` the batch stops early and the report
/// reflects the droplets actually completed.
pub fn run_batch_cancellable(
    field: &mut Heightfield,
    params: &ErosionParameters,
    rng: &mut impl Rng,
    n: u32,
    mut should_cancel: impl FnMut() -> bool,
) -> Result<BatchReport, ErosionError> {
    params.validate()?;

    log::info!("running batch of {n} droplets");
    let start = Instant::now();

    let mut droplets_run = 0u32;
    let mut degenerate_droplets = 0u32;
    let mut cancelled = false;

    for _ in 0..n {
        if should_cancel() {
            cancelled = true;
            break;
        }

        let outcome = simulate_one(field, params, rng);
        if outcome.degenerate {
            degenerate_droplets += 1;
            log::warn!("droplet terminated early: numeric overflow guard tripped");
        }
        droplets_run += 1;
    }

    let wall_time = start.elapsed();
    log::info!(
        "batch complete: {droplets_run}/{n} droplets in {wall_time:?}, {degenerate_droplets} degenerate, cancelled={cancelled}"
    );

    Ok(BatchReport {
        droplets_run,
        wall_time,
        cancelled,
        degenerate_droplets,
    })
}
