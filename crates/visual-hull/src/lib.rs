//! High-level facade for the `visual-hull-*` workspace.
//!
//! Reconstructs a voxel occupancy volume of an object from calibrated,
//! blue-screened photographs by shape-from-silhouette carving.
//!
//! This crate provides:
//! - re-exports of the stage crates (`core`, `silhouette`, `carve`),
//! - an in-memory end-to-end pipeline ([`pipeline::reconstruct_in_memory`]),
//! - (feature `image`) loading of image directories and projection JSON,
//!   plus [`pipeline::reconstruct`] driven by a [`ReconstructConfig`],
//! - exporters: VTK rectilinear grid (`.vtr`) and a JSON run report.
//!
//! ## Quickstart
//!
//! ```no_run
//! use visual_hull::{pipeline, ReconstructConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ReconstructConfig::load_json("dino.json")?;
//! let recon = pipeline::reconstruct(&cfg)?;
//! visual_hull::export::write_vtr(cfg.output_path(), &recon.result)?;
//! println!("max votes: {}", recon.result.max_votes());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `visual_hull::core`: images, masks, projection matrices, logger.
//! - `visual_hull::silhouette`: background keying and morphology.
//! - `visual_hull::carve`: voxel lattice and carving engine.
//! - `visual_hull::io` (feature `image`): input loading.
//! - `visual_hull::export`: `.vtr` writer and run report.

pub use visual_hull_carve as carve;
pub use visual_hull_core as core;
pub use visual_hull_silhouette as silhouette;

pub use visual_hull_carve::{CarveParams, CarveResult, LatticeParams, VoxelLattice};
pub use visual_hull_core::{ColorImage, ImageSize, MaskImage, ProjectionMatrix};
pub use visual_hull_silhouette::SilhouetteParams;

mod config;
mod error;
pub mod export;
pub mod pipeline;

#[cfg(feature = "image")]
pub mod io;

pub use config::ReconstructConfig;
pub use error::VisualHullError;
