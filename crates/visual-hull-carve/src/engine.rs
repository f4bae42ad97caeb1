//! Multi-camera carving: per-camera vote passes and their sum.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use visual_hull_core::{ImageSize, MaskImage, MaskImageView, ProjectionMatrix};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::lattice::axes_from_points;
use crate::vote::{voxel_vote, VoxelVote};
use crate::{AxisOrder, CarveError, CarveParams, LatticeAxes, VoxelLattice};

/// Vote tally of a single camera pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraStats {
    pub camera: usize,
    /// Voxels projecting onto silhouette foreground.
    pub foreground: usize,
    /// Voxels projecting onto background pixels.
    pub background: usize,
    pub out_of_frame: usize,
    pub degenerate: usize,
}

impl CameraStats {
    fn record(&mut self, vote: VoxelVote) {
        match vote {
            VoxelVote::Foreground => self.foreground += 1,
            VoxelVote::Background => self.background += 1,
            VoxelVote::OutOfFrame => self.out_of_frame += 1,
            VoxelVote::Degenerate => self.degenerate += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.foreground + self.background + self.out_of_frame + self.degenerate
    }
}

/// Raw carving output.
///
/// `occupancy[n]` counts the cameras whose silhouette contains the
/// projection of `voxels[n]`; both arrays follow the lattice flat order.
#[derive(Clone, Debug, PartialEq)]
pub struct CarveResult {
    pub occupancy: Vec<u32>,
    pub voxels: Vec<Point3<f64>>,
    pub axes: LatticeAxes,
    pub resolution: usize,
    pub axis_order: AxisOrder,
    pub camera_stats: Vec<CameraStats>,
}

impl CarveResult {
    #[inline]
    pub fn num_cameras(&self) -> usize {
        self.camera_stats.len()
    }

    #[inline]
    pub fn strides(&self) -> [usize; 3] {
        self.axis_order.strides(self.resolution)
    }

    pub fn max_votes(&self) -> u32 {
        self.occupancy.iter().copied().max().unwrap_or(0)
    }

    pub fn count_with_votes_at_least(&self, min_votes: u32) -> usize {
        self.occupancy.iter().filter(|&&v| v >= min_votes).count()
    }

    /// `histogram[v]` = number of voxels with exactly `v` votes, `v in 0..=num_cameras`.
    pub fn vote_histogram(&self) -> Vec<usize> {
        let mut hist = vec![0usize; self.num_cameras() + 1];
        for &v in &self.occupancy {
            hist[v as usize] += 1;
        }
        hist
    }

    /// Voxels with at least `min_votes` votes. Choosing the threshold is up to the caller;
    /// `num_cameras()` gives the strict visual hull.
    pub fn occupied_mask(&self, min_votes: u32) -> Vec<bool> {
        self.occupancy.iter().map(|&v| v >= min_votes).collect()
    }
}

/// Vote vector of one camera (`0`/`1` per voxel, lattice order) and its tally.
pub fn camera_votes(
    camera_index: usize,
    camera: &ProjectionMatrix,
    silhouette: &MaskImageView<'_>,
    voxels: &[Point3<f64>],
    params: &CarveParams,
) -> (Vec<u8>, CameraStats) {
    let mut stats = CameraStats {
        camera: camera_index,
        ..CameraStats::default()
    };
    let votes = voxels
        .iter()
        .map(|voxel| {
            let vote = voxel_vote(camera, silhouette, voxel, params);
            stats.record(vote);
            vote.value()
        })
        .collect();
    (votes, stats)
}

/// Carving engine bound to one lattice and projection policy.
#[derive(Clone, Debug)]
pub struct SpaceCarver<'a> {
    lattice: &'a VoxelLattice,
    params: CarveParams,
}

impl<'a> SpaceCarver<'a> {
    pub fn new(lattice: &'a VoxelLattice, params: CarveParams) -> Self {
        Self { lattice, params }
    }

    pub fn params(&self) -> &CarveParams {
        &self.params
    }

    fn validate(
        &self,
        projections: &[ProjectionMatrix],
        silhouettes: &[MaskImage],
        size: ImageSize,
    ) -> Result<(), CarveError> {
        self.params.validate()?;
        if size.is_empty() {
            return Err(CarveError::EmptyImageSize(size));
        }
        if projections.is_empty() && silhouettes.is_empty() {
            return Err(CarveError::NoCameras);
        }
        if projections.len() != silhouettes.len() {
            return Err(CarveError::CameraCountMismatch {
                projections: projections.len(),
                silhouettes: silhouettes.len(),
            });
        }
        for (camera, (p, mask)) in projections.iter().zip(silhouettes).enumerate() {
            if mask.size() != size {
                return Err(CarveError::SilhouetteSizeMismatch {
                    camera,
                    expected: size,
                    got: mask.size(),
                });
            }
            if !p.is_finite() {
                return Err(CarveError::NonFiniteProjection { camera });
            }
        }
        Ok(())
    }

    /// Project every voxel into every camera and sum the votes.
    ///
    /// Structural problems (camera count, silhouette size, bad parameters)
    /// fail before any voxel is processed. Out-of-frame and degenerate
    /// projections only contribute zero votes.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, projections, silhouettes),
            fields(cameras = projections.len(), voxels = self.lattice.len())
        )
    )]
    pub fn carve(
        &self,
        projections: &[ProjectionMatrix],
        silhouettes: &[MaskImage],
        size: ImageSize,
    ) -> Result<CarveResult, CarveError> {
        self.validate(projections, silhouettes, size)?;

        let voxels = self.lattice.points();
        let pass = |(camera, (p, mask)): (usize, (&ProjectionMatrix, &MaskImage))| {
            camera_votes(camera, p, &mask.view(), voxels, &self.params)
        };

        #[cfg(feature = "rayon")]
        let passes: Vec<(Vec<u8>, CameraStats)> = projections
            .par_iter()
            .zip(silhouettes.par_iter())
            .enumerate()
            .map(pass)
            .collect();
        #[cfg(not(feature = "rayon"))]
        let passes: Vec<(Vec<u8>, CameraStats)> = projections
            .iter()
            .zip(silhouettes.iter())
            .enumerate()
            .map(pass)
            .collect();

        let mut occupancy = vec![0u32; voxels.len()];
        let mut camera_stats = Vec::with_capacity(passes.len());
        for (votes, stats) in passes {
            for (acc, v) in occupancy.iter_mut().zip(votes) {
                *acc += u32::from(v);
            }
            log::debug!(
                "camera {}: {} foreground, {} background, {} out of frame, {} degenerate",
                stats.camera,
                stats.foreground,
                stats.background,
                stats.out_of_frame,
                stats.degenerate
            );
            camera_stats.push(stats);
        }

        let result = CarveResult {
            axes: axes_from_points(voxels, self.lattice.resolution(), self.lattice.axis_order()),
            voxels: voxels.to_vec(),
            occupancy,
            resolution: self.lattice.resolution(),
            axis_order: self.lattice.axis_order(),
            camera_stats,
        };
        log::info!(
            "carved {} voxels with {} cameras: max votes {}, {} voxels seen by every camera",
            result.voxels.len(),
            result.num_cameras(),
            result.max_votes(),
            result.count_with_votes_at_least(result.num_cameras() as u32)
        );
        Ok(result)
    }
}

/// Carve `lattice` against paired `projections` and `silhouettes`.
///
/// `projections[c]` and `silhouettes[c]` must describe the same camera and
/// every silhouette must be exactly `size`.
pub fn carve(
    projections: &[ProjectionMatrix],
    silhouettes: &[MaskImage],
    lattice: &VoxelLattice,
    size: ImageSize,
    params: &CarveParams,
) -> Result<CarveResult, CarveError> {
    SpaceCarver::new(lattice, params.clone()).carve(projections, silhouettes, size)
}
