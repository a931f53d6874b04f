// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generate visibilities of a sky model over the coverage of an array.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    display_warnings, make_coverage, ArrayArgs, InfoPrinter, ObservationArgs, SkyModelArgs,
    ARG_FILE_HELP,
};
use crate::{io::can_write_to_file, params::VisSimulateParams, ObservatoryError};

const DEFAULT_OUTPUT_VIS_FILENAME: &str = "observatory_vis.json";

lazy_static::lazy_static! {
    static ref OUTPUT_HELP: String =
        format!("Path to the output visibility json file. Default: {DEFAULT_OUTPUT_VIS_FILENAME}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct VisSimulateCliArgs {
    #[clap(short = 'o', long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct VisSimulateArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "array")]
    #[serde(default)]
    pub(super) array_args: ArrayArgs,

    #[clap(flatten)]
    #[serde(rename = "observation")]
    #[serde(default)]
    pub(super) observation_args: ObservationArgs,

    #[clap(flatten)]
    #[serde(rename = "sky-model")]
    #[serde(default)]
    pub(super) sky_model_args: SkyModelArgs,

    #[clap(flatten)]
    #[serde(rename = "vis-simulate")]
    #[serde(default)]
    pub(super) simulate_args: VisSimulateCliArgs,
}

impl VisSimulateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<VisSimulateArgs, ObservatoryError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let VisSimulateArgs {
                args_file: _,
                array_args,
                observation_args,
                sky_model_args,
                simulate_args,
            } = unpack_arg_file!(arg_file);

            Ok(VisSimulateArgs {
                args_file: None,
                array_args: cli_args.array_args.merge(array_args),
                observation_args: cli_args.observation_args.merge(observation_args),
                sky_model_args: cli_args.sky_model_args.merge(sky_model_args),
                simulate_args: VisSimulateCliArgs {
                    output: cli_args.simulate_args.output.or(simulate_args.output),
                },
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<VisSimulateParams, ObservatoryError> {
        debug!("{:#?}", self);

        let VisSimulateArgs {
            args_file: _,
            array_args,
            observation_args,
            sky_model_args,
            simulate_args: VisSimulateCliArgs { output },
        } = self;

        let array_params = array_args.parse()?;
        let obs = observation_args.parse(&array_params)?;
        let coverage = make_coverage(&array_params, &obs)?;
        let sky = sky_model_args.parse(coverage.max_uv_length())?;

        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_VIS_FILENAME));
        let is_json = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(VisSimulateArgsError::OutputNotJson(output).into());
        }
        can_write_to_file(&output)?;

        let mut printer = InfoPrinter::new("Output".into());
        printer.push_line(format!("Visibilities: {}", output.display()).into());
        printer.display();

        display_warnings();

        Ok(VisSimulateParams {
            sky,
            coverage,
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), ObservatoryError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum VisSimulateArgsError {
    #[error("Visibilities can only be written to json files; got '{}'", .0.display())]
    OutputNotJson(PathBuf),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use tempfile::{Builder, TempDir};

    use super::*;

    fn three_antenna_layout(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("layout.toml");
        std::fs::write(
            &path,
            indoc! {r#"
                [[antennas]]
                name = "A"
                east = 0.0
                north = 0.0

                [[antennas]]
                name = "B"
                east = 10.0
                north = 0.0

                [[antennas]]
                name = "C"
                east = 0.0
                north = 10.0
            "#},
        )
        .unwrap();
        path
    }

    #[test]
    fn json_arg_files_merge_with_cli_args() {
        let mut arg_file = Builder::new().suffix(".json").tempfile().unwrap();
        arg_file
            .write_all(
                indoc! {r#"
                    {
                        "array": {"layout": "layout.toml", "longitude": 116.67},
                        "observation": {"freq": 150.0, "hour": "6h30m", "no_zero_spacing": true},
                        "sky-model": {"width": 64},
                        "vis-simulate": {"output": "file.json"}
                    }
                "#}
                .as_bytes(),
            )
            .unwrap();

        let args = VisSimulateArgs {
            args_file: Some(arg_file.path().to_path_buf()),
            observation_args: ObservationArgs {
                freq: Some(200.0),
                ..Default::default()
            },
            sky_model_args: SkyModelArgs {
                height: Some(32),
                ..Default::default()
            },
            ..Default::default()
        }
        .merge()
        .unwrap();

        assert_eq!(args.array_args.layout, Some(PathBuf::from("layout.toml")));
        assert_eq!(args.array_args.longitude, Some(116.67));
        assert_eq!(args.observation_args.freq, Some(200.0));
        assert_eq!(args.observation_args.hour.as_deref(), Some("6h30m"));
        assert!(args.observation_args.no_zero_spacing);
        assert_eq!(args.sky_model_args.width, Some(64));
        assert_eq!(args.sky_model_args.height, Some(32));
        assert_eq!(args.simulate_args.output, Some(PathBuf::from("file.json")));
    }

    #[test]
    fn arg_files_need_a_known_extension() {
        let arg_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = VisSimulateArgs {
            args_file: Some(arg_file.path().to_path_buf()),
            ..Default::default()
        }
        .merge();
        assert!(matches!(result, Err(ObservatoryError::ArgFile(_))));
    }

    #[test]
    fn bad_arg_file_contents_are_reported() {
        let mut arg_file = Builder::new().suffix(".toml").tempfile().unwrap();
        arg_file.write_all(b"[array\nlayout = 3").unwrap();
        let result = VisSimulateArgs {
            args_file: Some(arg_file.path().to_path_buf()),
            ..Default::default()
        }
        .merge();
        assert!(matches!(result, Err(ObservatoryError::ArgFile(_))));
    }

    #[test]
    fn parse_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let layout = three_antenna_layout(&dir);
        let output = dir.path().join("vis.json");

        let params = VisSimulateArgs {
            array_args: ArrayArgs {
                layout: Some(layout),
                ..Default::default()
            },
            sky_model_args: SkyModelArgs {
                width: Some(32),
                height: Some(32),
                ..Default::default()
            },
            simulate_args: VisSimulateCliArgs {
                output: Some(output.clone()),
            },
            ..Default::default()
        }
        .parse()
        .unwrap();

        // 3 baselines and the zero spacing.
        assert_eq!(params.coverage.len(), 4);
        assert_eq!(params.sky.dim(), (32, 32));
        assert_eq!(params.output, output);
        // Parsing shouldn't leave the output file behind.
        assert!(!output.exists());
    }

    #[test]
    fn output_must_be_json() {
        let dir = TempDir::new().unwrap();
        let layout = three_antenna_layout(&dir);

        let result = VisSimulateArgs {
            array_args: ArrayArgs {
                layout: Some(layout),
                ..Default::default()
            },
            sky_model_args: SkyModelArgs {
                width: Some(32),
                height: Some(32),
                ..Default::default()
            },
            simulate_args: VisSimulateCliArgs {
                output: Some(dir.path().join("vis.uvfits")),
            },
            ..Default::default()
        }
        .parse();
        assert!(matches!(result, Err(ObservatoryError::VisSimulate(_))));
    }

    #[test]
    fn phase_centre_below_the_horizon_is_an_error() {
        let dir = TempDir::new().unwrap();
        let layout = three_antenna_layout(&dir);

        // The south celestial pole never rises for an array at the north
        // pole.
        let result = VisSimulateArgs {
            array_args: ArrayArgs {
                layout: Some(layout),
                latitude: Some(90.0),
                ..Default::default()
            },
            observation_args: ObservationArgs {
                ra: Some(0.0),
                dec: Some(-90.0),
                num_timesteps: Some(3),
                ..Default::default()
            },
            simulate_args: VisSimulateCliArgs {
                output: Some(dir.path().join("vis.json")),
            },
            ..Default::default()
        }
        .parse();
        assert!(matches!(result, Err(ObservatoryError::Coverage(_))));
    }
}
