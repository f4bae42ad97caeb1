//! Per-voxel projection steps.
//!
//! One camera's vote for one voxel is computed as
//! `project -> perspective_divide -> round_pixel -> classify -> label lookup`.
//! Each step is a plain function so it can be tested on its own.

use nalgebra::{Point2, Point3, Vector3};
use visual_hull_core::{ImageSize, MaskImageView, ProjectionMatrix};

use crate::{CarveParams, RoundingMode};

/// Integer pixel position: `col` is the image x coordinate, `row` the y coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub row: i64,
    pub col: i64,
}

/// Where a voxel lands in one camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelHit {
    /// Inside `[0, width) x [0, height)`.
    Inside(Pixel),
    /// Projected outside the frame. Not an error; votes `0`.
    OutOfFrame,
    /// Depth too close to zero (or non-finite) for a perspective divide; votes `0`.
    Degenerate,
}

/// Outcome of one camera looking at one voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoxelVote {
    Foreground,
    Background,
    OutOfFrame,
    Degenerate,
}

impl VoxelVote {
    #[inline]
    pub fn value(self) -> u8 {
        u8::from(self == VoxelVote::Foreground)
    }
}

/// Homogeneous image point `(u*w, v*w, w)` of a world point.
#[inline]
pub fn project(camera: &ProjectionMatrix, voxel: &Point3<f64>) -> Vector3<f64> {
    camera.project(voxel)
}

/// Divide by the homogeneous depth.
///
/// Returns `None` when `|w| < min_abs_depth`, when `w` is NaN, or when the
/// quotient is not finite.
#[inline]
pub fn perspective_divide(uvw: &Vector3<f64>, min_abs_depth: f64) -> Option<Point2<f64>> {
    let w = uvw.z;
    // negated comparison so that NaN depth is rejected too
    if !(w.abs() >= min_abs_depth) || w == 0.0 {
        return None;
    }
    let uv = Point2::new(uvw.x / w, uvw.y / w);
    (uv.x.is_finite() && uv.y.is_finite()).then_some(uv)
}

/// Snap continuous image coordinates to the nearest pixel.
///
/// Values beyond the `i64` range saturate and end up out of frame.
#[inline]
pub fn round_pixel(uv: &Point2<f64>, rounding: RoundingMode) -> Pixel {
    Pixel {
        row: rounding.round(uv.y) as i64,
        col: rounding.round(uv.x) as i64,
    }
}

impl PixelHit {
    #[inline]
    pub fn classify(pixel: Pixel, size: ImageSize) -> Self {
        if size.contains(pixel.row, pixel.col) {
            PixelHit::Inside(pixel)
        } else {
            PixelHit::OutOfFrame
        }
    }
}

/// Locate a voxel in a camera image of the given size.
#[inline]
pub fn locate(
    camera: &ProjectionMatrix,
    voxel: &Point3<f64>,
    size: ImageSize,
    params: &CarveParams,
) -> PixelHit {
    let uvw = project(camera, voxel);
    match perspective_divide(&uvw, params.min_abs_depth) {
        Some(uv) => PixelHit::classify(round_pixel(&uv, params.rounding), size),
        None => PixelHit::Degenerate,
    }
}

/// Full per-voxel vote of one camera.
#[inline]
pub fn voxel_vote(
    camera: &ProjectionMatrix,
    silhouette: &MaskImageView<'_>,
    voxel: &Point3<f64>,
    params: &CarveParams,
) -> VoxelVote {
    match locate(camera, voxel, silhouette.size(), params) {
        PixelHit::Inside(px) => {
            if silhouette.get(px.col as usize, px.row as usize) != 0 {
                VoxelVote::Foreground
            } else {
                VoxelVote::Background
            }
        }
        PixelHit::OutOfFrame => VoxelVote::OutOfFrame,
        PixelHit::Degenerate => VoxelVote::Degenerate,
    }
}
