//! Silhouette extraction for space carving.
//!
//! Each photograph is keyed against a saturated background color:
//! 1. per-pixel L1 distance to the background reference,
//! 2. pixels with `distance <= threshold` are background, all others object,
//! 3. the labels are collapsed into a single-channel `{0, 1}` mask,
//! 4. a morphological opening with a square kernel removes isolated specks.
//!
//! ```
//! use visual_hull_core::ColorImage;
//! use visual_hull_silhouette::{extract_silhouette, SilhouetteParams};
//!
//! let params = SilhouetteParams::default();
//! let screen = ColorImage::filled(8, 6, [0.0, 0.0, 0.75]).unwrap();
//! let mask = extract_silhouette(&screen.view(), &params).unwrap();
//! assert_eq!(mask.count_foreground(), 0);
//! ```

mod error;
mod extract;
mod morphology;
mod params;

pub use error::SilhouetteError;
pub use extract::{extract_silhouette, extract_silhouettes, key_background};
pub use morphology::{dilate, erode, open};
pub use params::SilhouetteParams;
