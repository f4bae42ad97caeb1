//! Voxel lattice construction and silhouette carving.
//!
//! ## Quickstart
//!
//! ```
//! use visual_hull_carve::{carve, CarveParams, LatticeParams, VoxelLattice};
//! use visual_hull_core::{ImageSize, MaskImage, ProjectionMatrix};
//!
//! let lattice = VoxelLattice::new(&LatticeParams {
//!     resolution: 4,
//!     ..LatticeParams::default()
//! })
//! .unwrap();
//! let camera = ProjectionMatrix::from_array([
//!     [100.0, 0.0, 0.0, 50.0],
//!     [0.0, 100.0, 0.0, 50.0],
//!     [0.0, 0.0, 0.0, 1.0],
//! ]);
//! let silhouette = MaskImage::ones(100, 100).unwrap();
//!
//! let result = carve(
//!     &[camera],
//!     &[silhouette],
//!     &lattice,
//!     ImageSize::new(100, 100),
//!     &CarveParams::default(),
//! )
//! .unwrap();
//! assert_eq!(result.occupancy.len(), 4 * 4 * 4);
//! ```
//!
//! Pipeline per camera:
//! 1. project every lattice point through the 3x4 matrix,
//! 2. perspective-divide (near-zero depth yields no vote),
//! 3. round to the nearest pixel,
//! 4. out-of-frame pixels vote `0`, in-frame pixels vote the silhouette label.
//!
//! The occupancy of a voxel is the sum of its votes over all cameras. Which
//! vote count makes a voxel "occupied" is left to the caller.

mod engine;
mod error;
mod lattice;
mod params;
pub mod vote;

pub use engine::{camera_votes, carve, CameraStats, CarveResult, SpaceCarver};
pub use error::{CarveError, LatticeError};
pub use lattice::{AxisOrder, LatticeAxes, LatticeParams, VoxelLattice};
pub use params::{CarveParams, RoundingMode};
