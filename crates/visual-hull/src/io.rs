//! Loading camera images and projection matrices from disk.
//!
//! Camera correspondence is positional: the `c`-th projection matrix in the
//! JSON file belongs to the `c`-th image in lexicographic file-name order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::ImageReader;
use serde::{Deserialize, Serialize};
use visual_hull_core::{ColorImage, ProjectionMatrix};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::VisualHullError;

/// File extensions picked up by [`list_image_files`], compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["ppm", "pgm", "png", "jpg", "jpeg", "bmp", "tif", "tiff"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectionsFile {
    Bare(Vec<ProjectionMatrix>),
    Wrapped { projections: Vec<ProjectionMatrix> },
}

#[derive(Debug, Serialize)]
struct ProjectionsOut<'a> {
    projections: &'a [ProjectionMatrix],
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_image_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, VisualHullError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decode one image into normalized RGB. Alpha is dropped, gray is replicated.
pub fn load_color_image(path: impl AsRef<Path>) -> Result<ColorImage, VisualHullError> {
    let path = path.as_ref();
    let decode = |source| VisualHullError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode)?
        .to_rgb32f();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Ok(ColorImage::from_raw(w, h, img.into_raw())?)
}

/// Load every image in `dir` in camera order. All images must share one size.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(dir)))]
pub fn load_images_dir(dir: impl AsRef<Path>) -> Result<Vec<ColorImage>, VisualHullError> {
    let dir = dir.as_ref();
    let files = list_image_files(dir)?;
    if files.is_empty() {
        return Err(VisualHullError::NoImages(dir.to_path_buf()));
    }

    let mut images: Vec<ColorImage> = Vec::with_capacity(files.len());
    for path in files {
        let img = load_color_image(&path)?;
        if let Some(first) = images.first() {
            if first.size() != img.size() {
                return Err(VisualHullError::ImageSizeMismatch {
                    path,
                    expected: first.size(),
                    got: img.size(),
                });
            }
        }
        log::debug!("camera {}: {} ({})", images.len(), path.display(), img.size());
        images.push(img);
    }
    log::info!("loaded {} images from {}", images.len(), dir.display());
    Ok(images)
}

/// Read projection matrices: either a bare JSON array of 3x4 row arrays or
/// an object with a `projections` field holding that array.
pub fn load_projections_json(
    path: impl AsRef<Path>,
) -> Result<Vec<ProjectionMatrix>, VisualHullError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let file: ProjectionsFile = serde_json::from_str(&raw)?;
    let projections = match file {
        ProjectionsFile::Bare(p) => p,
        ProjectionsFile::Wrapped { projections } => projections,
    };
    log::info!(
        "loaded {} projection matrices from {}",
        projections.len(),
        path.as_ref().display()
    );
    Ok(projections)
}

/// Write projection matrices in the wrapped form accepted by [`load_projections_json`].
pub fn write_projections_json(
    path: impl AsRef<Path>,
    projections: &[ProjectionMatrix],
) -> Result<(), VisualHullError> {
    let json = serde_json::to_string_pretty(&ProjectionsOut { projections })?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_image_extension(Path::new("a/cam01.PPM")));
        assert!(has_image_extension(Path::new("cam.jpeg")));
        assert!(!has_image_extension(Path::new("cameras.json")));
        assert!(!has_image_extension(Path::new("README")));
    }

    #[test]
    fn both_projection_layouts_parse() {
        let row = "[[1,0,0,0],[0,1,0,0],[0,0,1,1]]";
        let bare: ProjectionsFile = serde_json::from_str(&format!("[{row},{row}]")).expect("bare");
        let wrapped: ProjectionsFile =
            serde_json::from_str(&format!("{{\"projections\": [{row}]}}")).expect("wrapped");
        assert!(matches!(bare, ProjectionsFile::Bare(ref p) if p.len() == 2));
        assert!(matches!(wrapped, ProjectionsFile::Wrapped { ref projections } if projections.len() == 1));
    }
}
