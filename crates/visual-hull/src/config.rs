//! JSON configuration for an end-to-end reconstruction run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use visual_hull_carve::{CarveParams, LatticeParams};
use visual_hull_silhouette::SilhouetteParams;

use crate::VisualHullError;

fn default_output_path() -> String {
    "output.vtr".to_string()
}

/// Inputs, outputs and stage parameters of one reconstruction.
///
/// Only `image_dir` and `projections_path` are required; every stage
/// parameter falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructConfig {
    /// Directory of camera images; lexicographic file-name order is camera order.
    pub image_dir: String,
    /// JSON file with one 3x4 matrix per camera, in camera order.
    pub projections_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub silhouette: SilhouetteParams,
    #[serde(default)]
    pub lattice: LatticeParams,
    #[serde(default)]
    pub carve: CarveParams,
}

impl ReconstructConfig {
    pub fn new(image_dir: impl Into<String>, projections_path: impl Into<String>) -> Self {
        Self {
            image_dir: image_dir.into(),
            projections_path: projections_path.into(),
            output_path: default_output_path(),
            report_path: None,
            silhouette: SilhouetteParams::default(),
            lattice: LatticeParams::default(),
            carve: CarveParams::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisualHullError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisualHullError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_path)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report_path.as_ref().map(PathBuf::from)
    }
}
