// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use crate::{get_cmd_output, observatory, write_layout};

/// Read a text image back as rows of pixels.
fn read_txt_image(file: &Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(file)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
        .collect()
}

#[test]
fn image_and_clean_a_point_source() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let out = dir.path().join("images");

    let cmd = observatory()
        .args([
            "image",
            "--no-progress-bars",
            "--width=32",
            "--height=16",
            "--clean",
            "--output-types",
            "txt",
            "--layout",
        ])
        .arg(&layout)
        .arg("--output-dir")
        .arg(&out)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "{stderr}");
    assert!(stdout.contains("CLEAN"), "{stdout}");

    for name in [
        "sky",
        "sampling",
        "psf",
        "dirty",
        "clean_model",
        "residual",
        "clean_beam",
        "restored",
    ] {
        let image = read_txt_image(&out.join(format!("{name}.txt")));
        // Rows run along x.
        assert_eq!(image.len(), 16, "{name}");
        assert!(image.iter().all(|row| row.len() == 32), "{name}");
    }

    let psf = read_txt_image(&out.join("psf.txt"));
    let peak = psf
        .iter()
        .flatten()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_abs_diff_eq!(peak, 1.0, epsilon = 1e-9);
    // The phase centre is at (nx/2, ny/2); the top row is the last y.
    assert_abs_diff_eq!(psf[16 - 1 - 8][16], 1.0, epsilon = 1e-9);

    let dirty_sum: f64 = read_txt_image(&out.join("dirty.txt"))
        .iter()
        .flatten()
        .sum();
    assert_abs_diff_eq!(dirty_sum, 1.0, epsilon = 1e-6);
}

#[test]
fn dry_runs_write_no_images() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let out = dir.path().join("images");

    let cmd = observatory()
        .args(["image", "--dry-run", "-w", "natural", "--layout"])
        .arg(&layout)
        .arg("-o")
        .arg(&out)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!out.join("dirty.txt").exists());
}

#[test]
fn unknown_weightings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);

    let cmd = observatory()
        .args(["image", "--dry-run", "--weighting", "briggs", "--layout"])
        .arg(&layout)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("briggs"), "{stderr}");
}
