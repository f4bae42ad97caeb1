use visual_hull_core::ImageError;

/// Errors returned by silhouette extraction.
#[derive(thiserror::Error, Debug)]
pub enum SilhouetteError {
    #[error("kernel_size must be odd and >= 1 (got {0})")]
    InvalidKernelSize(usize),
    #[error("distance_threshold must be finite (got {0})")]
    InvalidThreshold(f32),
    #[error("background_rgb must be finite (got {0:?})")]
    InvalidBackground([f32; 3]),
    #[error("image {index} failed: {source}")]
    Image {
        index: usize,
        #[source]
        source: ImageError,
    },
    #[error(transparent)]
    InvalidImage(#[from] ImageError),
}
