use serde::{Deserialize, Serialize};

use crate::ImageError;

const CHANNELS: usize = 3;

/// Pixel dimensions of a camera image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.height as u64 && (col as u64) < self.width as u64
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn checked_len(width: usize, height: usize, channels: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(ImageError::InvalidDimensions { width, height })
}

/// Borrowed RGB image, row-major interleaved `[r, g, b, r, g, b, ...]`,
/// channel values normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct ColorImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [f32], // len = w*h*3
}

impl<'a> ColorImageView<'a> {
    /// Wrap a borrowed buffer, checking that it holds exactly three channels per pixel.
    pub fn new(width: usize, height: usize, data: &'a [f32]) -> Result<Self, ImageError> {
        let expected = checked_len(width, height, CHANNELS)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                kind: "rgb",
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|c| [c[0], c[1], c[2]])
    }
}

/// Owned RGB image with normalized `f32` channels.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ColorImage {
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        ColorImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [f32; 3]) -> Result<Self, ImageError> {
        let len = checked_len(width, height, CHANNELS)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert 8-bit interleaved RGB into normalized channels.
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = checked_len(width, height, CHANNELS)?;
        if bytes.len() != expected {
            return Err(ImageError::InvalidBuffer {
                kind: "rgb8",
                expected,
                got: bytes.len(),
            });
        }
        let data = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn view(&self) -> ColorImageView<'_> {
        ColorImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }
}

/// Borrowed binary mask, row-major, labels in `{0, 1}`.
#[derive(Clone, Copy, Debug)]
pub struct MaskImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl MaskImageView<'_> {
    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Label at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Owned binary mask: `1` marks the object, `0` the background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl MaskImage {
    /// All-background mask.
    pub fn zeros(width: usize, height: usize) -> Result<Self, ImageError> {
        let len = checked_len(width, height, 1)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// All-foreground mask.
    pub fn ones(width: usize, height: usize) -> Result<Self, ImageError> {
        let mut mask = Self::zeros(width, height)?;
        mask.data.fill(1);
        Ok(mask)
    }

    /// Wrap raw labels. Every value must be `0` or `1`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = checked_len(width, height, 1)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                kind: "mask",
                expected,
                got: data.len(),
            });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(ImageError::InvalidLabel { index, value });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    pub fn view(&self) -> MaskImageView<'_> {
        MaskImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, label: bool) {
        self.data[y * self.width + x] = u8::from(label);
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Render the mask as a color image: foreground white, background black.
    ///
    /// Feeding the result back through silhouette extraction with the same
    /// background reference reproduces the mask.
    pub fn to_color_image(&self) -> ColorImage {
        let mut data = Vec::with_capacity(self.data.len() * CHANNELS);
        for &label in &self.data {
            let v = if label != 0 { 1.0 } else { 0.0 };
            data.extend_from_slice(&[v, v, v]);
        }
        ColorImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
