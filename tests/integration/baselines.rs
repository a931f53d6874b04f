// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{get_cmd_output, observatory, write_layout};

#[test]
fn baselines_are_printed() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);

    let cmd = observatory()
        .args(["baselines", "--no-progress-bars", "--layout"])
        .arg(&layout)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "{stderr}");
    assert!(stdout.contains("6 baselines"), "{stdout}");
    assert!(stdout.contains("Tile011"), "{stdout}");
    assert!(stdout.contains("Tile014"), "{stdout}");
}

#[test]
fn baselines_are_written_to_json() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let output = dir.path().join("baselines.json");

    let cmd = observatory()
        .args(["baselines", "--layout"])
        .arg(&layout)
        .arg("--output")
        .arg(&output)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let baselines = json.as_array().unwrap();
    assert_eq!(baselines.len(), 6);
    // Baselines are ordered by antenna pair.
    assert_eq!(baselines[0]["ant1"], 0);
    assert_eq!(baselines[0]["ant2"], 1);
    assert_eq!(baselines[5]["ant1"], 2);
    assert_eq!(baselines[5]["ant2"], 3);
}

#[test]
fn dry_runs_write_nothing() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let output = dir.path().join("baselines.json");

    let cmd = observatory()
        .args(["baselines", "--dry-run", "--layout"])
        .arg(&layout)
        .arg("-o")
        .arg(&output)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!output.exists());
}

#[test]
fn arguments_can_be_saved_and_reused() {
    let dir = TempDir::new().unwrap();
    let layout = write_layout(&dir);
    let toml = dir.path().join("args.toml");

    let cmd = observatory()
        .args(["baselines", "--dry-run", "--latitude", "-26.7", "--layout"])
        .arg(&layout)
        .arg("--save-toml")
        .arg(&toml)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let contents = std::fs::read_to_string(&toml).unwrap();
    assert!(contents.contains("[array]"), "{contents}");
    assert!(contents.contains("-26.7"), "{contents}");

    // The saved file is all that's needed for the next run.
    let cmd = observatory()
        .args(["baselines", "--dry-run"])
        .arg(&toml)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("-26.7000"), "{stdout}");
}

#[test]
fn a_bad_layout_is_reported() {
    let dir = TempDir::new().unwrap();
    let layout = dir.path().join("layout.toml");
    std::fs::write(&layout, "[[antennas]]\neast = \"zero\"\n").unwrap();

    let cmd = observatory()
        .args(["baselines", "--layout"])
        .arg(&layout)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Couldn't decode toml"), "{stderr}");
    assert!(stderr.contains("[[antennas]]"), "{stderr}");
}
