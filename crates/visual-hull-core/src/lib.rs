//! Core types shared by the `visual-hull-*` crates.
//!
//! This crate is intentionally small. It holds the value types that flow
//! between the carving stages and does *not* depend on any image codec:
//! - [`ColorImage`]: normalized RGB pixels in `[0, 1]`,
//! - [`MaskImage`]: binary object/background labels,
//! - [`ProjectionMatrix`]: a calibrated 3x4 camera matrix.

mod error;
mod image;
mod logger;
mod projection;

pub use error::ImageError;
pub use image::{ColorImage, ColorImageView, ImageSize, MaskImage, MaskImageView};
pub use projection::ProjectionMatrix;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level};
