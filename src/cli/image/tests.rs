// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use indoc::indoc;
use tempfile::{Builder, TempDir};

use super::*;

/// A small, irregular layout so the (u,v) plane is sparsely sampled.
fn write_layout(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("layout.json");
    std::fs::write(
        &path,
        indoc! {r#"
            {
                "antennas": [
                    {"name": "A0", "east": 0.0, "north": 0.0},
                    {"name": "A1", "east": 35.0, "north": -15.0},
                    {"name": "A2", "east": -20.0, "north": 25.0},
                    {"name": "A3", "east": 35.0, "north": 35.0},
                    {"name": "A4", "east": 25.0, "north": 10.0}
                ]
            }
        "#},
    )
    .unwrap();
    path
}

fn args_for(dir: &TempDir) -> ImageArgs {
    ImageArgs {
        array_args: ArrayArgs {
            layout: Some(write_layout(dir)),
            ..Default::default()
        },
        sky_model_args: SkyModelArgs {
            width: Some(32),
            height: Some(32),
            ..Default::default()
        },
        image_args: ImageCliArgs {
            output_dir: Some(dir.path().join("images")),
            output_types: Some(vec!["txt".to_string()]),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn file_args_fill_in_missing_cli_args() {
    let mut arg_file = Builder::new().suffix(".toml").tempfile().unwrap();
    arg_file
        .write_all(
            indoc! {r#"
                [array]
                layout = "layout.toml"

                [observation]
                ra = 10.0
                dec = -30.0
                num_timesteps = 5

                [image]
                weighting = "natural"
                clean = true
                clean_gain = 0.2
                output_types = ["txt", "png"]
            "#}
            .as_bytes(),
        )
        .unwrap();

    let args = ImageArgs {
        args_file: Some(arg_file.path().to_path_buf()),
        observation_args: ObservationArgs {
            num_timesteps: Some(2),
            ..Default::default()
        },
        image_args: ImageCliArgs {
            weighting: Some("uniform".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
    .merge()
    .unwrap();

    assert_eq!(args.observation_args.ra, Some(10.0));
    assert_eq!(args.observation_args.dec, Some(-30.0));
    assert_eq!(args.observation_args.num_timesteps, Some(2));
    assert_eq!(args.image_args.weighting.as_deref(), Some("uniform"));
    assert!(args.image_args.clean);
    assert_eq!(args.image_args.clean_gain, Some(0.2));
    assert_eq!(
        args.image_args.output_types,
        Some(vec!["txt".to_string(), "png".to_string()])
    );
}

#[test]
fn merged_args_survive_a_toml_round_trip() {
    // What --save-toml writes must be readable as an argument file.
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir);
    args.observation_args.hour = Some("3h15m".to_string());
    args.image_args.clean = true;

    let toml_str = toml::to_string(&args).unwrap();
    let arg_file = dir.path().join("saved.toml");
    std::fs::write(&arg_file, toml_str).unwrap();

    let from_file = ImageArgs {
        args_file: Some(arg_file),
        ..Default::default()
    }
    .merge()
    .unwrap();
    assert_eq!(from_file.array_args.layout, args.array_args.layout);
    assert_eq!(from_file.observation_args.hour, args.observation_args.hour);
    assert_eq!(from_file.sky_model_args.width, Some(32));
    assert!(from_file.image_args.clean);
    assert_eq!(from_file.image_args.output_dir, args.image_args.output_dir);
}

#[test]
fn parse_default_imaging() {
    let dir = TempDir::new().unwrap();
    let params = args_for(&dir).parse().unwrap();
    assert_eq!(params.weighting, Weighting::Uniform);
    assert!(params.clean.is_none());
    assert_eq!(params.output_types.as_slice(), &[ImageOutputType::Txt]);
    assert_eq!(params.sky.dim(), (32, 32));
    // 10 baselines and the zero spacing.
    assert_eq!(params.coverage.len(), 11);
}

#[test]
fn parse_weightings() {
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir);
    args.image_args.weighting = Some("Natural".to_string());
    assert_eq!(args.parse().unwrap().weighting, Weighting::Natural);

    let mut args = args_for(&dir);
    args.image_args.weighting = Some("robust".to_string());
    assert!(matches!(args.parse(), Err(ObservatoryError::Image(_))));
}

#[test]
fn parse_clean_arguments() {
    let params = parse_clean_args(true, None, None, None, None)
        .unwrap()
        .unwrap();
    assert_eq!(params, CleanParams::default());

    let params = parse_clean_args(true, Some(0.5), Some(0.01), None, Some(20))
        .unwrap()
        .unwrap();
    assert_eq!(params.gain, 0.5);
    assert_eq!(params.max_iterations, 20);
    assert_eq!(params.threshold, CleanThreshold::Absolute(0.01));

    let params = parse_clean_args(true, None, None, Some(0.2), None)
        .unwrap()
        .unwrap();
    assert_eq!(params.threshold, CleanThreshold::Fraction(0.2));

    assert!(parse_clean_args(false, Some(0.5), None, None, None)
        .unwrap()
        .is_none());
}

#[test]
fn bad_clean_arguments() {
    assert!(matches!(
        parse_clean_args(true, Some(0.0), None, None, None),
        Err(ImageArgsError::BadCleanGain(_))
    ));
    assert!(matches!(
        parse_clean_args(true, Some(1.5), None, None, None),
        Err(ImageArgsError::BadCleanGain(_))
    ));
    assert!(matches!(
        parse_clean_args(true, None, Some(-1.0), None, None),
        Err(ImageArgsError::BadCleanThreshold(_))
    ));
    assert!(matches!(
        parse_clean_args(true, None, None, Some(2.0), None),
        Err(ImageArgsError::BadCleanThresholdFraction(_))
    ));
    assert!(matches!(
        parse_clean_args(true, None, Some(0.1), Some(0.1), None),
        Err(ImageArgsError::TwoCleanThresholds)
    ));
}

#[test]
fn bad_output_types() {
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir);
    args.image_args.output_types = Some(vec!["fits".to_string()]);
    assert!(matches!(args.parse(), Err(ObservatoryError::Image(_))));

    let mut args = args_for(&dir);
    args.image_args.output_types = Some(vec![]);
    assert!(matches!(args.parse(), Err(ObservatoryError::Image(_))));
}

#[test]
fn duplicate_output_types_are_collapsed() {
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir);
    args.image_args.output_types = Some(vec!["txt".to_string(), "TXT".to_string()]);
    let params = args.parse().unwrap();
    assert_eq!(params.output_types.len(), 1);
}

#[test]
fn run_writes_all_products() {
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir);
    args.image_args.clean = true;
    let params = args.parse().unwrap();
    params.run().unwrap();

    let out = dir.path().join("images");
    for name in IMAGE_PRODUCTS.iter().chain(CLEAN_PRODUCTS.iter()) {
        let file = out.join(format!("{name}.txt"));
        assert!(file.exists(), "{} is missing", file.display());
    }

    // The dirty image preserves the flux of the 1 Jy point source.
    let dirty = std::fs::read_to_string(out.join("dirty.txt")).unwrap();
    let sum: f64 = dirty
        .split_whitespace()
        .map(|v| v.parse::<f64>().unwrap())
        .sum();
    approx::assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-6);
}

#[test]
fn run_without_clean_writes_only_undeconvolved_products() {
    let dir = TempDir::new().unwrap();
    let params = args_for(&dir).parse().unwrap();
    params.run().unwrap();

    let out = dir.path().join("images");
    for name in IMAGE_PRODUCTS {
        assert!(out.join(format!("{name}.txt")).exists());
    }
    for name in CLEAN_PRODUCTS {
        assert!(!out.join(format!("{name}.txt")).exists());
    }
}
