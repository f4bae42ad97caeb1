//! `visual-hull`: carve an occupancy volume from calibrated silhouettes.
//!
//! ```text
//! visual-hull --config run.json
//! visual-hull input/ --projections input/cameras.json --output dino.vtr --resolution 64
//! ```

use std::path::PathBuf;

use clap::Parser;
use visual_hull::export::{write_vtr, CarveReport};
use visual_hull::{pipeline, ReconstructConfig};

#[cfg(not(feature = "tracing"))]
use visual_hull::core::{init_with_level, parse_level};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use visual_hull::core::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "visual-hull", version, about)]
struct Args {
    /// JSON run config; command-line options override its fields.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory of camera images (sorted by file name).
    #[arg(required_unless_present = "config")]
    image_dir: Option<String>,

    /// JSON file with one 3x4 projection matrix per image.
    #[arg(long, short = 'p', required_unless_present = "config")]
    projections: Option<String>,

    /// Output `.vtr` path.
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Optional JSON run report path.
    #[arg(long)]
    report: Option<String>,

    /// Lattice samples per axis.
    #[arg(long, short = 'r')]
    resolution: Option<usize>,

    /// off, error, warn, info, debug or trace.
    #[cfg(not(feature = "tracing"))]
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> Result<ReconstructConfig, Box<dyn std::error::Error>> {
        let mut cfg = match &self.config {
            Some(path) => ReconstructConfig::load_json(path)?,
            None => ReconstructConfig::new(
                self.image_dir.clone().unwrap_or_default(),
                self.projections.clone().unwrap_or_default(),
            ),
        };
        if let Some(dir) = self.image_dir {
            cfg.image_dir = dir;
        }
        if let Some(p) = self.projections {
            cfg.projections_path = p;
        }
        if let Some(out) = self.output {
            cfg.output_path = out;
        }
        if self.report.is_some() {
            cfg.report_path = self.report;
        }
        if let Some(s) = self.resolution {
            cfg.lattice.resolution = s;
        }
        Ok(cfg)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    #[cfg(not(feature = "tracing"))]
    init_with_level(parse_level(&args.log_level))?;

    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        init_tracing(args.log_json);
    }

    let cfg = args.into_config()?;
    run(&cfg)
}

fn run(cfg: &ReconstructConfig) -> Result<(), Box<dyn std::error::Error>> {
    let recon = match pipeline::reconstruct(cfg) {
        Ok(recon) => recon,
        Err(err) => {
            if let Some(path) = cfg.report_path() {
                let mut report = CarveReport::failed(&err);
                report.image_dir = Some(cfg.image_dir.clone());
                report.projections_path = Some(cfg.projections_path.clone());
                report.write_json(&path)?;
            }
            return Err(err.into());
        }
    };

    let output = cfg.output_path();
    write_vtr(&output, &recon.result)?;

    let result = &recon.result;
    log::info!(
        "{} cameras, {} voxels, max votes {}, {} inside every silhouette",
        result.num_cameras(),
        result.occupancy.len(),
        result.max_votes(),
        result.count_with_votes_at_least(result.num_cameras() as u32)
    );

    if let Some(path) = cfg.report_path() {
        let mut report = CarveReport::from_reconstruction(&recon);
        report.image_dir = Some(cfg.image_dir.clone());
        report.projections_path = Some(cfg.projections_path.clone());
        report.output_path = Some(output.to_string_lossy().into_owned());
        report.write_json(&path)?;
        log::info!("wrote report to {}", path.display());
    }
    Ok(())
}
