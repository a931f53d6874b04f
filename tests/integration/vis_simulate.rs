// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use crate::{get_cmd_output, observatory, write_layout};

#[test]
fn tracked_observation_of_a_point_source() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let output = dir.path().join("vis.json");

    // From the south pole, a source at -60° declination never sets.
    let cmd = observatory()
        .args([
            "vis-simulate",
            "--no-progress-bars",
            "--latitude=-90",
            "--ra=0",
            "--dec=-60",
            "--num-timesteps=3",
            "--width=32",
            "--height=32",
            "--layout",
        ])
        .arg(&layout)
        .arg("-o")
        .arg(&output)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "{stderr}");
    assert!(stdout.contains("No sky model was given"), "{stdout}");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let vis = json.as_array().unwrap();
    // 6 baselines over 3 timesteps, and the zero spacing.
    assert_eq!(vis.len(), 19);
    assert_eq!(vis.iter().filter(|v| v["ant1"].is_null()).count(), 1);
    for (t, expected) in [(0_u64, 7), (1, 6), (2, 6)] {
        assert_eq!(vis.iter().filter(|v| v["timestep"] == t).count(), expected);
    }

    // A point source at the phase centre is seen identically by every
    // baseline.
    for v in vis {
        assert_abs_diff_eq!(v["re"].as_f64().unwrap(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(v["im"].as_f64().unwrap(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn snapshot_from_an_argument_file() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let output = dir.path().join("vis.json");
    let sky = dir.path().join("sky.json");
    std::fs::write(
        &sky,
        r#"{"components": [{"type": "point", "l": 0.5, "m": 0.25, "flux": 2.0}]}"#,
    )
    .unwrap();
    let args = dir.path().join("args.toml");
    std::fs::write(
        &args,
        format!(
            "[array]\nlayout = {layout:?}\n\n[sky-model]\nsky_model = {sky:?}\nwidth = 64\nheight = 64\ncell_size = 3.0\n\n[vis-simulate]\noutput = {output:?}\n"
        ),
    )
    .unwrap();

    let cmd = observatory().arg("simulate-vis").arg(&args).ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let vis = json.as_array().unwrap();
    // 6 baselines, and the zero spacing.
    assert_eq!(vis.len(), 7);
    for v in vis {
        let re = v["re"].as_f64().unwrap();
        let im = v["im"].as_f64().unwrap();
        assert_abs_diff_eq!(re.hypot(im), 2.0, epsilon = 1e-9);
    }
}

#[test]
fn a_phase_centre_below_the_horizon_is_an_error() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);

    let cmd = observatory()
        .args([
            "vis-simulate",
            "--latitude=90",
            "--ra=0",
            "--dec=-45",
            "--layout",
        ])
        .arg(&layout)
        .arg("-o")
        .arg(dir.path().join("vis.json"))
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("below the horizon"), "{stderr}");
}
