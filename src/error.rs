// ── error.rs ───────────────────────────────────────────────────────────────

use thiserror::Error;

/// Errors surfaced by the public API. Interior routines never throw —
/// they assume the simulator's own bounds checks already hold.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErosionError {
    #[error("invalid heightfield size {width}x{height}: both dimensions must be >= 2")]
    InvalidSize { width: u32, height: u32 },

    #[error("invalid erosion parameter `{0}`: value out of its admissible range")]
    InvalidParameter(&'static str),
}
