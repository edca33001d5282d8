// ── params.rs ──────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::ErosionError;

/// Immutable configuration bundle for a droplet batch. Serialised to/from
/// JSON the same way the application this engine was extracted from
/// serialises its terrain config, so it can cross an IPC boundary unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErosionParameters {
    /// Max steps per droplet.
    pub drop_lifetime: u32,
    /// Blend of prior direction vs. new gradient, in `[0, 1]`.
    pub inertia: f32,
    /// Multiplier on sediment-carrying capacity, must be `> 0`.
    pub capacity: f32,
    /// Floor on capacity (prevents zero on flats), must be `>= 0`.
    pub min_capacity: f32,
    /// Fraction of excess sediment deposited per step, in `[0, 1]`.
    pub deposition: f32,
    /// Fraction of free capacity erodible per step, in `[0, 1]`.
    pub erosion: f32,
    /// Erosion-kernel radius in cells, must be `>= 1`.
    pub radius: u32,
    /// Velocity-update coefficient, must be `> 0`.
    pub gravity: f32,
    /// Per-step water loss fraction, in `[0, 1]`.
    pub evaporation: f32,
}

impl Default for ErosionParameters {
    fn default() -> Self {
        Self {
            drop_lifetime: 50,
            inertia: 0.05,
            capacity: 4.0,
            min_capacity: 0.01,
            deposition: 0.3,
            erosion: 0.3,
            radius: 3,
            gravity: 4.0,
            evaporation: 0.05,
        }
    }
}

impl ErosionParameters {
    /// Checks every field against its admissible range, in the order they
    /// are documented, and returns the first violation found.
    pub fn validate(&self) -> Result<(), ErosionError> {
        let unit_range = |v: f32| (0.0..=1.0).contains(&v) && v.is_finite();

        if !unit_range(self.inertia) {
            return Err(ErosionError::InvalidParameter("inertia"));
        }
        if !(self.capacity.is_finite() && self.capacity > 0.0) {
            return Err(ErosionError::InvalidParameter("capacity"));
        }
        if !(self.min_capacity.is_finite() && self.min_capacity >= 0.0) {
            return Err(ErosionError::InvalidParameter("min_capacity"));
        }
        if !unit_range(self.deposition) {
            return Err(ErosionError::InvalidParameter("deposition"));
        }
        if !unit_range(self.erosion) {
            return Err(ErosionError::InvalidParameter("erosion"));
        }
        if self.radius < 1 {
            return Err(ErosionError::InvalidParameter("radius"));
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(ErosionError::InvalidParameter("gravity"));
        }
        if !unit_range(self.evaporation) {
            return Err(ErosionError::InvalidParameter("evaporation"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ErosionParameters::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_inertia() {
        let params = ErosionParameters {
            inertia: 1.5,
            ..Default::default()
        };
        assert_eq!(
            params.validate().unwrap_err(),
            ErosionError::InvalidParameter("inertia")
        );
    }

    #[test]
    fn rejects_nan_fields() {
        let params = ErosionParameters {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            params.validate().unwrap_err(),
            ErosionError::InvalidParameter("gravity")
        );
    }

    #[test]
    fn rejects_zero_radius() {
        let params = ErosionParameters {
            radius: 0,
            ..Default::default()
        };
        assert_eq!(
            params.validate().unwrap_err(),
            ErosionError::InvalidParameter("radius")
        );
    }

    #[test]
    fn json_round_trip_uses_camel_case() {
        let params = ErosionParameters::default();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("dropLifetime"));
        assert!(json.contains("minCapacity"));

        let back: ErosionParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
