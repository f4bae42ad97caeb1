use serde::{Deserialize, Serialize};

use crate::SilhouetteError;

/// Configuration for background keying and mask clean-up.
///
/// The defaults match a blue-screen turntable rig: saturated blue
/// background, generous L1 threshold, 5x5 opening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilhouetteParams {
    /// Background reference color, normalized RGB.
    pub background_rgb: [f32; 3],
    /// Pixels whose L1 distance to `background_rgb` is `<=` this value are background.
    pub distance_threshold: f32,
    /// Side of the square structuring element used for the opening.
    ///
    /// Must be odd. `1` disables the clean-up.
    pub kernel_size: usize,
}

impl Default for SilhouetteParams {
    fn default() -> Self {
        Self {
            background_rgb: [0.0, 0.0, 0.75],
            distance_threshold: 1.1,
            kernel_size: 5,
        }
    }
}

impl SilhouetteParams {
    pub fn validate(&self) -> Result<(), SilhouetteError> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(SilhouetteError::InvalidKernelSize(self.kernel_size));
        }
        if !self.distance_threshold.is_finite() {
            return Err(SilhouetteError::InvalidThreshold(self.distance_threshold));
        }
        if self.background_rgb.iter().any(|c| !c.is_finite()) {
            return Err(SilhouetteError::InvalidBackground(self.background_rgb));
        }
        Ok(())
    }

    /// Radius of the structuring element around its center pixel.
    #[inline]
    pub(crate) fn kernel_radius(&self) -> usize {
        self.kernel_size / 2
    }
}
