use std::path::PathBuf;

use visual_hull_carve::{CarveError, LatticeError};
use visual_hull_core::{ImageError, ImageSize};
use visual_hull_silhouette::SilhouetteError;

/// Errors produced by the facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum VisualHullError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "image")]
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no images found in {0}")]
    NoImages(PathBuf),

    #[error("{path} is {got}, expected {expected} like the first image")]
    ImageSizeMismatch {
        path: PathBuf,
        expected: ImageSize,
        got: ImageSize,
    },

    #[error("camera count mismatch: {projections} projection matrices, {images} images")]
    CameraCountMismatch { projections: usize, images: usize },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Silhouette(#[from] SilhouetteError),

    #[error(transparent)]
    Lattice(#[from] LatticeError),

    #[error(transparent)]
    Carve(#[from] CarveError),
}
