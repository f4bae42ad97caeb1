use visual_hull_core::ImageSize;

/// Invalid lattice configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    #[error("resolution must be >= 2 (got {0})")]
    ResolutionTooSmall(usize),
    #[error("resolution {0} overflows the voxel count")]
    ResolutionTooLarge(usize),
    #[error("scale_divisor must be finite and non-zero (got {0})")]
    InvalidScale(f64),
    #[error("offset must be finite (got {0:?})")]
    InvalidOffset([f64; 3]),
}

/// Structural errors that abort a carve before any voxel is processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CarveError {
    #[error("no cameras supplied")]
    NoCameras,
    #[error("camera count mismatch: {projections} projection matrices, {silhouettes} silhouettes")]
    CameraCountMismatch {
        projections: usize,
        silhouettes: usize,
    },
    #[error("silhouette {camera} is {got}, expected {expected}")]
    SilhouetteSizeMismatch {
        camera: usize,
        expected: ImageSize,
        got: ImageSize,
    },
    #[error("image size must be non-empty (got {0})")]
    EmptyImageSize(ImageSize),
    #[error("projection matrix {camera} has non-finite entries")]
    NonFiniteProjection { camera: usize },
    #[error("min_abs_depth must be finite and >= 0 (got {0})")]
    InvalidMinDepth(f64),
}
