// ── lib.rs ─────────────────────────────────────────────────────────────────
//! Seeded fractal value-noise and particle-based hydraulic erosion for
//! terrain heightfields.
//!
//! This crate is the simulation core factored out of WorldWeaver's terrain
//! editor: a [`Heightfield`] seeded from a [`NoiseField`], shaped by
//! thousands of simulated water droplets via [`run_batch`]. It has no
//! window, GPU, or UI dependency — callers own the heightfield and drive
//! generation and erosion themselves, then read [`Heightfield::data`] to
//! build whatever they render with.

mod batch;
mod droplet;
mod error;
mod heightfield;
mod noise;
mod params;

pub use batch::{run_batch, run_batch_cancellable, BatchReport};
pub use error::ErosionError;
pub use heightfield::Heightfield;
pub use noise::{NoiseField, ValueNoise};
pub use params::ErosionParameters;
