// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! List the baselines of an antenna layout.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{display_warnings, ArrayArgs, InfoPrinter, ARG_FILE_HELP};
use crate::{
    baselines::generate_baselines,
    io::can_write_to_file,
    params::BaselinesParams,
    ObservatoryError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct BaselinesCliArgs {
    /// Write the baselines to this json file.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct BaselinesArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "array")]
    #[serde(default)]
    pub(super) array_args: ArrayArgs,

    #[clap(flatten)]
    #[serde(rename = "baselines")]
    #[serde(default)]
    pub(super) baselines_args: BaselinesCliArgs,
}

impl BaselinesArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    pub(super) fn merge(self) -> Result<BaselinesArgs, ObservatoryError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let BaselinesArgs {
                args_file: _,
                array_args,
                baselines_args,
            } = unpack_arg_file!(arg_file);

            Ok(BaselinesArgs {
                args_file: None,
                array_args: cli_args.array_args.merge(array_args),
                baselines_args: BaselinesCliArgs {
                    output: cli_args.baselines_args.output.or(baselines_args.output),
                },
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<BaselinesParams, ObservatoryError> {
        debug!("{:#?}", self);

        let BaselinesArgs {
            args_file: _,
            array_args,
            baselines_args: BaselinesCliArgs { output },
        } = self;

        let array_params = array_args.parse()?;
        let baselines = generate_baselines(&array_params.array, &array_params.flags);
        let num_unflagged = array_params.flags.num_unflagged();

        if let Some(output) = &output {
            let is_json = output
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !is_json {
                return Err(BaselinesArgsError::OutputNotJson(output.clone()).into());
            }
            can_write_to_file(output)?;
        }

        let mut printer = InfoPrinter::new("Baselines".into());
        printer.push_line(
            format!(
                "{} baselines from {num_unflagged} usable antennas",
                baselines.len()
            )
            .into(),
        );
        if let Some(output) = &output {
            printer.push_line(format!("Writing to {}", output.display()).into());
        }
        printer.display();

        display_warnings();

        Ok(BaselinesParams {
            array: array_params.array,
            baselines,
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
pub(super) enum BaselinesArgsError {
    #[error("Baselines can only be written to json files; got '{}'", .0.display())]
    OutputNotJson(PathBuf),
}
