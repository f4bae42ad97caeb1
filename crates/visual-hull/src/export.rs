//! Writers for carving results: VTK rectilinear grids and a JSON run report.
//!
//! The `.vtr` writer emits ASCII VTK XML with one `occupancy` point-data
//! array. VTK expects x to vary fastest, so values are reordered from the
//! lattice flat order through [`CarveResult::strides`].

use std::{
    fmt::Write as _,
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use visual_hull_carve::{AxisOrder, CameraStats, CarveResult};
use visual_hull_core::ImageSize;

use crate::pipeline::{Reconstruction, TimingsMs};
use crate::VisualHullError;

const VALUES_PER_LINE: usize = 12;

fn write_values<W: Write>(
    out: &mut W,
    values: impl Iterator<Item = f64>,
    indent: &str,
) -> io::Result<()> {
    let mut line = String::new();
    for (n, v) in values.enumerate() {
        if n % VALUES_PER_LINE == 0 && !line.is_empty() {
            writeln!(out, "{indent}{}", line.trim_end())?;
            line.clear();
        }
        // `write!` into a String cannot fail.
        let _ = write!(line, "{} ", v as f32);
    }
    if !line.is_empty() {
        writeln!(out, "{indent}{}", line.trim_end())?;
    }
    Ok(())
}

/// Stream `result` as a VTK XML RectilinearGrid.
pub fn write_vtr_to<W: Write>(out: &mut W, result: &CarveResult) -> io::Result<()> {
    let s = result.resolution;
    let [sx, sy, sz] = result.strides();
    let extent = format!("0 {m} 0 {m} 0 {m}", m = s.saturating_sub(1));

    writeln!(out, "<?xml version=\"1.0\"?>")?;
    writeln!(
        out,
        "<VTKFile type=\"RectilinearGrid\" version=\"0.1\" byte_order=\"LittleEndian\">"
    )?;
    writeln!(out, "  <RectilinearGrid WholeExtent=\"{extent}\">")?;
    writeln!(out, "    <Piece Extent=\"{extent}\">")?;

    writeln!(out, "      <PointData Scalars=\"occupancy\">")?;
    writeln!(
        out,
        "        <DataArray type=\"Float32\" Name=\"occupancy\" format=\"ascii\">"
    )?;
    let occupancy = (0..s).flat_map(|k| {
        (0..s).flat_map(move |j| (0..s).map(move |i| i * sx + j * sy + k * sz))
    });
    write_values(
        out,
        occupancy.map(|n| f64::from(result.occupancy[n])),
        "          ",
    )?;
    writeln!(out, "        </DataArray>")?;
    writeln!(out, "      </PointData>")?;
    writeln!(out, "      <CellData>")?;
    writeln!(out, "      </CellData>")?;

    writeln!(out, "      <Coordinates>")?;
    for (name, axis) in [
        ("x", &result.axes.x),
        ("y", &result.axes.y),
        ("z", &result.axes.z),
    ] {
        writeln!(
            out,
            "        <DataArray type=\"Float32\" Name=\"{name}\" format=\"ascii\">"
        )?;
        write_values(out, axis.iter().copied(), "          ")?;
        writeln!(out, "        </DataArray>")?;
    }
    writeln!(out, "      </Coordinates>")?;

    writeln!(out, "    </Piece>")?;
    writeln!(out, "  </RectilinearGrid>")?;
    writeln!(out, "</VTKFile>")?;
    Ok(())
}

/// Render `result` as a `.vtr` document in memory.
pub fn render_vtr(result: &CarveResult) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_vtr_to(&mut buf, result);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write `result` to `path` as a `.vtr` file.
pub fn write_vtr(path: impl AsRef<Path>, result: &CarveResult) -> Result<(), VisualHullError> {
    let path = path.as_ref();
    let mut out = BufWriter::new(fs::File::create(path)?);
    write_vtr_to(&mut out, result)?;
    out.flush()?;
    log::info!(
        "wrote {}^3 occupancy grid to {}",
        result.resolution,
        path.display()
    );
    Ok(())
}

/// Summary of one reconstruction run, written next to the `.vtr` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarveReport {
    #[serde(default)]
    pub image_dir: Option<String>,
    #[serde(default)]
    pub projections_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    pub num_cameras: usize,
    #[serde(default)]
    pub image_size: Option<ImageSize>,
    pub resolution: usize,
    #[serde(default)]
    pub axis_order: AxisOrder,
    pub max_votes: u32,
    /// `vote_histogram[v]` voxels received exactly `v` votes.
    pub vote_histogram: Vec<usize>,
    /// Voxels inside every silhouette.
    pub consistent_voxels: usize,
    pub silhouette_foreground: Vec<usize>,
    pub camera_stats: Vec<CameraStats>,
    pub timings_ms: TimingsMs,
    #[serde(default)]
    pub error: Option<String>,
}

impl CarveReport {
    pub fn from_reconstruction(recon: &Reconstruction) -> Self {
        let result = &recon.result;
        let num_cameras = result.num_cameras();
        Self {
            num_cameras,
            image_size: Some(recon.image_size),
            resolution: result.resolution,
            axis_order: result.axis_order,
            max_votes: result.max_votes(),
            vote_histogram: result.vote_histogram(),
            consistent_voxels: result.count_with_votes_at_least(num_cameras as u32),
            silhouette_foreground: recon.silhouette_foreground.clone(),
            camera_stats: result.camera_stats.clone(),
            timings_ms: recon.timings_ms,
            ..Self::default()
        }
    }

    /// Report for a run that stopped before producing a result.
    pub fn failed(error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Load a JSON report from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisualHullError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisualHullError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visual_hull_carve::{LatticeParams, VoxelLattice};

    fn result_with(order: AxisOrder, s: usize) -> CarveResult {
        let lattice = VoxelLattice::new(&LatticeParams {
            axis_order: order,
            ..LatticeParams::unit(s)
        })
        .expect("lattice");
        let axes = lattice.axes();
        // Encode (i, j, k) in the vote count so the output order is observable.
        let occupancy = (0..lattice.len())
            .map(|n| {
                let [i, j, k] = lattice.coords(n);
                (i + 10 * j + 100 * k) as u32
            })
            .collect();
        CarveResult {
            occupancy,
            voxels: lattice.points().to_vec(),
            axes,
            resolution: s,
            axis_order: order,
            camera_stats: Vec::new(),
        }
    }

    fn occupancy_block(doc: &str) -> Vec<u32> {
        let start = doc.find("Name=\"occupancy\"").expect("array");
        let body = &doc[start..];
        let open = body.find('>').expect("open") + 1;
        let close = body.find("</DataArray>").expect("close");
        body[open..close]
            .split_whitespace()
            .map(|t| t.parse::<f32>().expect("number") as u32)
            .collect()
    }

    #[test]
    fn header_and_extent() {
        let doc = render_vtr(&result_with(AxisOrder::XSlowest, 3));
        assert!(doc.contains("<VTKFile type=\"RectilinearGrid\""));
        assert!(doc.contains("WholeExtent=\"0 2 0 2 0 2\""));
        assert!(doc.contains("Name=\"x\""));
        assert!(doc.contains("Name=\"z\""));
        assert!(doc.trim_end().ends_with("</VTKFile>"));
    }

    #[test]
    fn occupancy_is_written_x_fastest_for_both_orders() {
        let expected: Vec<u32> = (0..3)
            .flat_map(|k: u32| {
                (0..3).flat_map(move |j: u32| (0..3).map(move |i: u32| i + 10 * j + 100 * k))
            })
            .collect();
        for order in [AxisOrder::XSlowest, AxisOrder::XFastest] {
            let doc = render_vtr(&result_with(order, 3));
            assert_eq!(occupancy_block(&doc), expected, "{order:?}");
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = CarveReport {
            num_cameras: 2,
            resolution: 4,
            vote_histogram: vec![60, 2, 2],
            error: None,
            ..CarveReport::default()
        };
        let json = serde_json::to_string(&report).expect("ser");
        let back: CarveReport = serde_json::from_str(&json).expect("de");
        assert_eq!(back.vote_histogram, vec![60, 2, 2]);
        assert_eq!(back.num_cameras, 2);

        let failed = CarveReport::failed("boom");
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
