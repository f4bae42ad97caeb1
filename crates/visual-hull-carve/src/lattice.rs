//! Regular voxel lattice in calibrated world coordinates.
//!
//! The lattice is built from integer indices `(i, j, k) in [0, s)^3`:
//! each axis is normalized to `[0, 1]` by dividing by `s - 1`, the cloud is
//! centered on its mean point, divided by `scale_divisor`, and finally
//! shifted by `offset`.
//!
//! Flattening follows [`AxisOrder`]. With the default
//! [`AxisOrder::XSlowest`] the flat index is `i * s^2 + j * s + k`, so the
//! x/y/z sample positions can be recovered by striding the point array with
//! `s^2`, `s` and `1`.

use nalgebra::{Matrix4xX, Point3, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::LatticeError;

/// Flattening convention of the `(i, j, k)` lattice indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    /// Row-major `[x][y][z]`: `index = i*s^2 + j*s + k` (z varies fastest).
    #[default]
    XSlowest,
    /// Column-major: `index = k*s^2 + j*s + i` (x varies fastest).
    XFastest,
}

impl AxisOrder {
    /// Flat-index strides of the x, y and z axes for resolution `s`.
    #[inline]
    pub fn strides(self, s: usize) -> [usize; 3] {
        match self {
            AxisOrder::XSlowest => [s * s, s, 1],
            AxisOrder::XFastest => [1, s, s * s],
        }
    }

    /// Lattice indices `(i, j, k)` of a flat index.
    #[inline]
    pub fn coords(self, index: usize, s: usize) -> [usize; 3] {
        let slow = index / (s * s);
        let mid = (index / s) % s;
        let fast = index % s;
        match self {
            AxisOrder::XSlowest => [slow, mid, fast],
            AxisOrder::XFastest => [fast, mid, slow],
        }
    }

    #[inline]
    pub fn index(self, ijk: [usize; 3], s: usize) -> usize {
        let [sx, sy, sz] = self.strides(s);
        ijk[0] * sx + ijk[1] * sy + ijk[2] * sz
    }
}

/// Lattice configuration.
///
/// Defaults reproduce a turntable dataset whose object sits roughly 0.62
/// units below the world origin; other rigs need their own `scale_divisor`
/// and `offset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeParams {
    /// Samples per axis (`s`).
    pub resolution: usize,
    /// The centered unit cube is divided by this value.
    pub scale_divisor: f64,
    /// Added to every point after scaling.
    pub offset: [f64; 3],
    pub axis_order: AxisOrder,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            resolution: 120,
            scale_divisor: 5.0,
            offset: [0.0, 0.0, -0.62],
            axis_order: AxisOrder::XSlowest,
        }
    }
}

impl LatticeParams {
    /// Centered unit cube with no scaling or offset.
    pub fn unit(resolution: usize) -> Self {
        Self {
            resolution,
            scale_divisor: 1.0,
            offset: [0.0; 3],
            axis_order: AxisOrder::XSlowest,
        }
    }

    /// Number of voxels, `s^3`.
    pub fn voxel_count(&self) -> Result<usize, LatticeError> {
        self.resolution
            .checked_pow(3)
            .ok_or(LatticeError::ResolutionTooLarge(self.resolution))
    }

    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.resolution < 2 {
            return Err(LatticeError::ResolutionTooSmall(self.resolution));
        }
        self.voxel_count()?;
        if !self.scale_divisor.is_finite() || self.scale_divisor == 0.0 {
            return Err(LatticeError::InvalidScale(self.scale_divisor));
        }
        if self.offset.iter().any(|v| !v.is_finite()) {
            return Err(LatticeError::InvalidOffset(self.offset));
        }
        Ok(())
    }
}

/// Unique sample positions along each axis, `resolution` values each,
/// strictly increasing when `scale_divisor > 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeAxes {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Candidate voxel centers in world coordinates, in flat lattice order.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelLattice {
    resolution: usize,
    axis_order: AxisOrder,
    points: Vec<Point3<f64>>,
}

impl VoxelLattice {
    /// Build the lattice. Deterministic: equal params give bit-identical points.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(params), fields(resolution = params.resolution))
    )]
    pub fn new(params: &LatticeParams) -> Result<Self, LatticeError> {
        params.validate()?;
        let s = params.resolution;
        let n = params.voxel_count()?;
        let max_index = (s - 1) as f64;
        let order = params.axis_order;

        let mut points: Vec<Point3<f64>> = (0..n)
            .map(|flat| {
                let [i, j, k] = order.coords(flat, s);
                Point3::new(i as f64 / max_index, j as f64 / max_index, k as f64 / max_index)
            })
            .collect();

        let mut sum = Vector3::zeros();
        for p in &points {
            sum += p.coords;
        }
        let mean = sum / n as f64;
        let offset = Vector3::from(params.offset);

        for p in &mut points {
            p.coords = (p.coords - mean) / params.scale_divisor + offset;
        }

        log::debug!(
            "voxel lattice: {s}^3 = {n} points, mean {:?}, scale 1/{}, offset {:?}",
            mean.as_slice(),
            params.scale_divisor,
            params.offset
        );

        Ok(Self {
            resolution: s,
            axis_order: order,
            points,
        })
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Voxel centers (`N x 3`), flat lattice order.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Homogeneous `4 x N` matrix (last row all ones), ready for a 3x4 projection.
    pub fn homogeneous(&self) -> Matrix4xX<f64> {
        Matrix4xX::from_fn(self.points.len(), |r, c| {
            if r < 3 {
                self.points[c][r]
            } else {
                1.0
            }
        })
    }

    #[inline]
    pub fn strides(&self) -> [usize; 3] {
        self.axis_order.strides(self.resolution)
    }

    /// Flat index of lattice cell `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        self.axis_order.index([i, j, k], self.resolution)
    }

    /// Lattice cell `(i, j, k)` of a flat index.
    #[inline]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        self.axis_order.coords(index, self.resolution)
    }

    /// Recover the per-axis sample positions by striding the flat point array.
    pub fn axes(&self) -> LatticeAxes {
        axes_from_points(&self.points, self.resolution, self.axis_order)
    }
}

/// Stride through a flat lattice-ordered point array to recover its axes.
pub(crate) fn axes_from_points(
    points: &[Point3<f64>],
    resolution: usize,
    order: AxisOrder,
) -> LatticeAxes {
    let [sx, sy, sz] = order.strides(resolution);
    let axis = |stride: usize, dim: usize| -> Vec<f64> {
        (0..resolution).map(|n| points[n * stride][dim]).collect()
    };
    LatticeAxes {
        x: axis(sx, 0),
        y: axis(sy, 1),
        z: axis(sz, 2),
    }
}
