use nalgebra::{Matrix3x4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Calibrated pinhole camera as a 3x4 matrix mapping homogeneous world
/// points to homogeneous image points `(u*w, v*w, w)`.
///
/// `u` is the image column and `v` the image row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 4]; 3]", into = "[[f64; 4]; 3]")]
pub struct ProjectionMatrix {
    pub p: Matrix3x4<f64>,
}

impl ProjectionMatrix {
    pub fn new(p: Matrix3x4<f64>) -> Self {
        Self { p }
    }

    pub fn from_array(rows: [[f64; 4]; 3]) -> Self {
        Self::new(Matrix3x4::from_fn(|r, c| rows[r][c]))
    }

    pub fn to_array(&self) -> [[f64; 4]; 3] {
        let mut rows = [[0.0; 4]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.p[(r, c)];
            }
        }
        rows
    }

    /// Project a Euclidean world point (implicit `w = 1`). No perspective divide.
    #[inline]
    pub fn project(&self, x: &Point3<f64>) -> Vector3<f64> {
        self.p * x.to_homogeneous()
    }

    pub fn is_finite(&self) -> bool {
        self.p.iter().all(|v| v.is_finite())
    }
}

impl From<[[f64; 4]; 3]> for ProjectionMatrix {
    fn from(rows: [[f64; 4]; 3]) -> Self {
        Self::from_array(rows)
    }
}

impl From<ProjectionMatrix> for [[f64; 4]; 3] {
    fn from(p: ProjectionMatrix) -> Self {
        p.to_array()
    }
}
