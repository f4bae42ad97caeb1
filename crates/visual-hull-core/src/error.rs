/// Errors raised when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid {kind} buffer length (expected {expected} values, got {got})")]
    InvalidBuffer {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("mask label {value} at index {index} is not 0 or 1")]
    InvalidLabel { index: usize, value: u8 },
}
