// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod baselines;
mod image;
mod vis_simulate;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;

fn observatory() -> Command {
    Command::cargo_bin("observatory").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// A four-antenna layout with a flagged antenna, written into `dir`.
fn write_layout<P: AsRef<Path>>(dir: P) -> PathBuf {
    let path = dir.as_ref().join("layout.toml");
    std::fs::write(
        &path,
        indoc! {r#"
            [[antennas]]
            name = "Tile011"
            east = 0.0
            north = 0.0

            [[antennas]]
            name = "Tile012"
            east = 42.0
            north = -7.5
            height = 0.3

            [[antennas]]
            name = "Tile013"
            east = -12.0
            north = 31.0

            [[antennas]]
            name = "Tile014"
            east = 18.0
            north = 24.0
            dish_diameter = 4.0
        "#},
    )
    .unwrap();
    path
}

#[test]
fn a_subcommand_is_required() {
    let cmd = observatory().ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("SUBCOMMAND"), "{stderr}");
}

#[test]
fn errors_are_displayed_not_debugged() {
    let cmd = observatory()
        .args(["baselines", "--layout", "/does/not/exist.toml"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("doesn't exist"), "{stderr}");
    assert!(!stderr.contains("FileDoesntExist"), "{stderr}");
}
