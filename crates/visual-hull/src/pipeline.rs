//! End-to-end reconstruction: images -> silhouettes -> lattice -> occupancy.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use visual_hull_carve::{carve, CarveError, CarveParams, CarveResult, LatticeParams, VoxelLattice};
use visual_hull_core::{ColorImage, ImageSize, ProjectionMatrix};
use visual_hull_silhouette::{extract_silhouettes, SilhouetteParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::VisualHullError;

/// Wall-clock time per stage, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load: u64,
    pub silhouettes: u64,
    pub lattice: u64,
    pub carve: u64,
    pub total: u64,
}

/// Output of a reconstruction run.
#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub result: CarveResult,
    pub image_size: ImageSize,
    /// Foreground pixel count of each camera's silhouette.
    pub silhouette_foreground: Vec<usize>,
    pub timings_ms: TimingsMs,
}

/// Number of cameras, after checking that projections and images pair up one to one.
pub fn pair_cameras(
    projections: &[ProjectionMatrix],
    images: &[ColorImage],
) -> Result<usize, VisualHullError> {
    if projections.len() != images.len() {
        return Err(VisualHullError::CameraCountMismatch {
            projections: projections.len(),
            images: images.len(),
        });
    }
    Ok(images.len())
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, u64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_millis() as u64)
}

/// Run silhouettes, lattice and carving on images already in memory.
///
/// `projections[c]` must belong to `images[c]`. Count mismatches fail
/// before any image is processed.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(cameras = projections.len()))
)]
pub fn reconstruct_in_memory(
    projections: &[ProjectionMatrix],
    images: &[ColorImage],
    silhouette: &SilhouetteParams,
    lattice: &LatticeParams,
    carve_params: &CarveParams,
) -> Result<Reconstruction, VisualHullError> {
    pair_cameras(projections, images)?;
    let Some(first) = images.first() else {
        return Err(CarveError::NoCameras.into());
    };
    let image_size = first.size();
    let t_total = Instant::now();

    let (silhouettes, silhouettes_ms) = timed(|| extract_silhouettes(images, silhouette));
    let silhouettes = silhouettes?;
    let silhouette_foreground: Vec<usize> =
        silhouettes.iter().map(|m| m.count_foreground()).collect();
    log::info!(
        "extracted {} silhouettes ({image_size}) in {silhouettes_ms} ms",
        silhouettes.len()
    );

    let (lattice, lattice_ms) = timed(|| VoxelLattice::new(lattice));
    let lattice = lattice?;
    log::info!(
        "built {}^3 lattice in {lattice_ms} ms",
        lattice.resolution()
    );

    let (result, carve_ms) =
        timed(|| carve(projections, &silhouettes, &lattice, image_size, carve_params));
    let result = result?;
    log::info!("carved in {carve_ms} ms");

    Ok(Reconstruction {
        result,
        image_size,
        silhouette_foreground,
        timings_ms: TimingsMs {
            load: 0,
            silhouettes: silhouettes_ms,
            lattice: lattice_ms,
            carve: carve_ms,
            total: t_total.elapsed().as_millis() as u64,
        },
    })
}

/// Load inputs named by `cfg` and run the full pipeline.
#[cfg(feature = "image")]
pub fn reconstruct(cfg: &crate::ReconstructConfig) -> Result<Reconstruction, VisualHullError> {
    use crate::io;

    let t_total = Instant::now();
    let (loaded, load_ms) = timed(|| -> Result<_, VisualHullError> {
        let projections = io::load_projections_json(&cfg.projections_path)?;
        let images = io::load_images_dir(&cfg.image_dir)?;
        Ok((projections, images))
    });
    let (projections, images) = loaded?;

    let mut recon = reconstruct_in_memory(
        &projections,
        &images,
        &cfg.silhouette,
        &cfg.lattice,
        &cfg.carve,
    )?;
    recon.timings_ms.load = load_ms;
    recon.timings_ms.total = t_total.elapsed().as_millis() as u64;
    Ok(recon)
}
