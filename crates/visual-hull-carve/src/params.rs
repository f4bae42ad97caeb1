use serde::{Deserialize, Serialize};

use crate::CarveError;

/// How projected pixel coordinates are snapped to integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Banker's rounding: `2.5 -> 2`, `3.5 -> 4`, `-0.5 -> 0`.
    #[default]
    HalfToEven,
    /// `2.5 -> 3`, `-0.5 -> -1`.
    HalfAwayFromZero,
}

impl RoundingMode {
    #[inline]
    pub fn round(self, v: f64) -> f64 {
        match self {
            RoundingMode::HalfToEven => v.round_ties_even(),
            RoundingMode::HalfAwayFromZero => v.round(),
        }
    }
}

/// Per-voxel projection policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParams {
    pub rounding: RoundingMode,
    /// Projections whose homogeneous depth satisfies `|w| < min_abs_depth`
    /// are degenerate and vote `0`.
    pub min_abs_depth: f64,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::HalfToEven,
            min_abs_depth: 1e-12,
        }
    }
}

impl CarveParams {
    pub fn validate(&self) -> Result<(), CarveError> {
        if !self.min_abs_depth.is_finite() || self.min_abs_depth < 0.0 {
            return Err(CarveError::InvalidMinDepth(self.min_abs_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_to_even_ties() {
        let r = RoundingMode::HalfToEven;
        assert_eq!(r.round(2.5), 2.0);
        assert_eq!(r.round(3.5), 4.0);
        assert_eq!(r.round(-0.5), 0.0);
        assert_eq!(r.round(2.4999), 2.0);
    }

    #[test]
    fn half_away_from_zero_ties() {
        let r = RoundingMode::HalfAwayFromZero;
        assert_eq!(r.round(2.5), 3.0);
        assert_eq!(r.round(-0.5), -1.0);
        assert_eq!(r.round(-1.5), -2.0);
    }

    #[test]
    fn rounding_mode_uses_snake_case_names() {
        let params: CarveParams =
            serde_json::from_str(r#"{ "rounding": "half_away_from_zero" }"#).expect("parse");
        assert_eq!(params.rounding, RoundingMode::HalfAwayFromZero);
        assert_eq!(params.min_abs_depth, 1e-12);
    }

    #[test]
    fn negative_min_depth_is_rejected() {
        let params = CarveParams {
            min_abs_depth: -1.0,
            ..CarveParams::default()
        };
        assert_eq!(params.validate(), Err(CarveError::InvalidMinDepth(-1.0)));
    }
}
