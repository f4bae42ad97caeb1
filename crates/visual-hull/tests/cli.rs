#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn write_dataset(dir: &Path) {
    let images = dir.join("images");
    fs::create_dir(&images).expect("mkdir");
    for name in ["view0.png", "view1.png", "view2.png"] {
        RgbImage::from_fn(24, 24, |x, y| {
            let (dx, dy) = (x as f32 - 12.0, y as f32 - 12.0);
            if dx * dx + dy * dy <= 36.0 {
                Rgb([255, 255, 0])
            } else {
                Rgb([0, 0, 191])
            }
        })
        .save(images.join(name))
        .expect("png");
    }
    let row = "[[12,0,0,12],[0,12,0,12],[0,0,0,1]]";
    fs::write(
        dir.join("cameras.json"),
        format!("{{\"projections\": [{row},{row},{row}]}}"),
    )
    .expect("json");
}

#[test]
fn missing_inputs_are_rejected() {
    Command::cargo_bin("visual-hull")
        .expect("binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--projections"));
}

#[test]
fn run_writes_vtr_and_report() {
    let tmp = tempfile::tempdir().expect("tmp");
    write_dataset(tmp.path());
    let out = tmp.path().join("hull.vtr");
    let report = tmp.path().join("report.json");

    Command::cargo_bin("visual-hull")
        .expect("binary")
        .current_dir(tmp.path())
        .args(["images", "--projections", "cameras.json", "--resolution", "6"])
        .arg("--output")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let doc = fs::read_to_string(&out).expect("vtr");
    assert!(doc.contains("<RectilinearGrid WholeExtent=\"0 5 0 5 0 5\">"));
    let report = fs::read_to_string(&report).expect("report");
    assert!(report.contains("\"num_cameras\": 3"));
    assert!(report.contains("\"max_votes\": 3"));
}

#[test]
fn config_file_with_overrides() {
    let tmp = tempfile::tempdir().expect("tmp");
    write_dataset(tmp.path());
    fs::write(
        tmp.path().join("run.json"),
        r#"{ "image_dir": "images", "projections_path": "cameras.json",
             "lattice": { "resolution": 4, "scale_divisor": 1.0, "offset": [0, 0, 0] } }"#,
    )
    .expect("cfg");

    Command::cargo_bin("visual-hull")
        .expect("binary")
        .current_dir(tmp.path())
        .args(["--config", "run.json", "--output", "small.vtr"])
        .assert()
        .success();
    let doc = fs::read_to_string(tmp.path().join("small.vtr")).expect("vtr");
    assert!(doc.contains("WholeExtent=\"0 3 0 3 0 3\""));
}

#[test]
fn unreadable_projections_fail_with_report() {
    let tmp = tempfile::tempdir().expect("tmp");
    write_dataset(tmp.path());
    fs::write(tmp.path().join("cameras.json"), "{}").expect("json");

    Command::cargo_bin("visual-hull")
        .expect("binary")
        .current_dir(tmp.path())
        .args(["images", "-p", "cameras.json", "--report", "report.json"])
        .assert()
        .failure();
    let report = fs::read_to_string(tmp.path().join("report.json")).expect("report");
    assert!(report.contains("\"error\""));
}
