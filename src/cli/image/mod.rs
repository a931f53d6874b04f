// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate an observation of a sky model, then reconstruct the sky's
//! brightness from the sampled visibilities.

#[cfg(test)]
mod tests;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vec1::Vec1;

use super::common::{
    display_warnings, make_coverage, ArrayArgs, InfoPrinter, ObservationArgs, SkyModelArgs, Warn,
    ARG_FILE_HELP,
};
use crate::{
    constants::{DEFAULT_CLEAN_GAIN, DEFAULT_CLEAN_MAX_ITERATIONS, DEFAULT_CLEAN_THRESHOLD_FRACTION},
    imaging::{CleanParams, CleanThreshold, Weighting, WEIGHTINGS_COMMA_SEPARATED},
    io::{
        can_write_to_file,
        write::{image_filenames, ImageOutputType, IMAGE_OUTPUT_EXTENSIONS},
    },
    params::ImageParams,
    ObservatoryError,
};

const DEFAULT_OUTPUT_DIR: &str = "observatory_images";

/// The images written for every run.
const IMAGE_PRODUCTS: [&str; 4] = ["sky", "sampling", "psf", "dirty"];

/// The images written when deconvolving.
const CLEAN_PRODUCTS: [&str; 4] = ["clean_model", "residual", "clean_beam", "restored"];

lazy_static::lazy_static! {
    static ref WEIGHTING_HELP: String =
        format!("How visibilities are weighted on the (u,v) grid. Supported: {}. Default: {}", *WEIGHTINGS_COMMA_SEPARATED, Weighting::default());

    static ref CLEAN_GAIN_HELP: String =
        format!("The fraction of the residual peak removed each CLEAN iteration. Default: {DEFAULT_CLEAN_GAIN}");

    static ref CLEAN_THRESHOLD_FRACTION_HELP: String =
        format!("Stop CLEANing when the residual peak is below this fraction of the dirty image's peak. Default: {DEFAULT_CLEAN_THRESHOLD_FRACTION}");

    static ref CLEAN_MAX_ITERATIONS_HELP: String =
        format!("The maximum number of CLEAN iterations. Default: {DEFAULT_CLEAN_MAX_ITERATIONS}");

    static ref OUTPUT_DIR_HELP: String =
        format!("The directory to write images into. Default: {DEFAULT_OUTPUT_DIR}");

    static ref OUTPUT_TYPES_HELP: String =
        format!("The image formats to write. Supported formats: {}. Default: {}", *IMAGE_OUTPUT_EXTENSIONS, default_output_types().iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", "));
}

fn default_output_types() -> Vec1<ImageOutputType> {
    #[cfg(feature = "plotting")]
    {
        vec1::vec1![ImageOutputType::Txt, ImageOutputType::Png]
    }
    #[cfg(not(feature = "plotting"))]
    {
        vec1::vec1![ImageOutputType::Txt]
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ImageCliArgs {
    #[clap(short, long, help = WEIGHTING_HELP.as_str(), help_heading = "IMAGING")]
    pub(super) weighting: Option<String>,

    /// Deconvolve the dirty image with Högbom CLEAN, and restore it with a
    /// Gaussian fitted to the PSF.
    #[clap(long, help_heading = "DECONVOLUTION")]
    #[serde(default)]
    pub(super) clean: bool,

    #[clap(long, help = CLEAN_GAIN_HELP.as_str(), help_heading = "DECONVOLUTION")]
    pub(super) clean_gain: Option<f64>,

    /// Stop CLEANing when the residual peak is below this value
    /// [Jy/pixel]. Overrides the fractional threshold.
    #[clap(long, help_heading = "DECONVOLUTION")]
    pub(super) clean_threshold: Option<f64>,

    #[clap(long, help = CLEAN_THRESHOLD_FRACTION_HELP.as_str(), help_heading = "DECONVOLUTION")]
    pub(super) clean_threshold_fraction: Option<f64>,

    #[clap(long, help = CLEAN_MAX_ITERATIONS_HELP.as_str(), help_heading = "DECONVOLUTION")]
    pub(super) clean_max_iterations: Option<usize>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_DIR_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    #[clap(long, multiple_values(true), help = OUTPUT_TYPES_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_types: Option<Vec<String>>,
}

impl ImageCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            weighting: self.weighting.or(other.weighting),
            clean: self.clean || other.clean,
            clean_gain: self.clean_gain.or(other.clean_gain),
            clean_threshold: self.clean_threshold.or(other.clean_threshold),
            clean_threshold_fraction: self
                .clean_threshold_fraction
                .or(other.clean_threshold_fraction),
            clean_max_iterations: self.clean_max_iterations.or(other.clean_max_iterations),
            output_dir: self.output_dir.or(other.output_dir),
            output_types: self.output_types.or(other.output_types),
        }
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ImageArgs {
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
    #[serde(rename = "image")]
    #[serde(default)]
    pub(super) image_args: ImageCliArgs,
}

/// Parse the CLEAN arguments. `None` means no deconvolution.
fn parse_clean_args(
    clean: bool,
    gain: Option<f64>,
    threshold: Option<f64>,
    threshold_fraction: Option<f64>,
    max_iterations: Option<usize>,
) -> Result<Option<CleanParams>, ImageArgsError> {
    if !clean {
        if gain.is_some()
            || threshold.is_some()
            || threshold_fraction.is_some()
            || max_iterations.is_some()
        {
            "CLEAN options were given without --clean; no deconvolution will be done".warn();
        }
        return Ok(None);
    }

    let gain = gain.unwrap_or(DEFAULT_CLEAN_GAIN);
    if !(gain > 0.0 && gain <= 1.0) {
        return Err(ImageArgsError::BadCleanGain(gain));
    }
    let threshold = match (threshold, threshold_fraction) {
        (Some(_), Some(_)) => return Err(ImageArgsError::TwoCleanThresholds),
        (Some(t), None) => {
            if !(t.is_finite() && t >= 0.0) {
                return Err(ImageArgsError::BadCleanThreshold(t));
            }
            CleanThreshold::Absolute(t)
        }
        (None, f) => {
            let f = f.unwrap_or(DEFAULT_CLEAN_THRESHOLD_FRACTION);
            if !(0.0..=1.0).contains(&f) {
                return Err(ImageArgsError::BadCleanThresholdFraction(f));
            }
            CleanThreshold::Fraction(f)
        }
    };
    Ok(Some(CleanParams {
        gain,
        max_iterations: max_iterations.unwrap_or(DEFAULT_CLEAN_MAX_ITERATIONS),
        threshold,
    }))
}

impl ImageArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<ImageArgs, ObservatoryError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ImageArgs {
                args_file: _,
                array_args,
                observation_args,
                sky_model_args,
                image_args,
            } = unpack_arg_file!(arg_file);

            Ok(ImageArgs {
                args_file: None,
                array_args: cli_args.array_args.merge(array_args),
                observation_args: cli_args.observation_args.merge(observation_args),
                sky_model_args: cli_args.sky_model_args.merge(sky_model_args),
                image_args: cli_args.image_args.merge(image_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ImageParams, ObservatoryError> {
        debug!("{:#?}", self);

        let ImageArgs {
            args_file: _,
            array_args,
            observation_args,
            sky_model_args,
            image_args:
                ImageCliArgs {
                    weighting,
                    clean,
                    clean_gain,
                    clean_threshold,
                    clean_threshold_fraction,
                    clean_max_iterations,
                    output_dir,
                    output_types,
                },
        } = self;

        // Check the simple things first.
        let weighting = match weighting {
            Some(w) => Weighting::from_str(&w.to_lowercase())
                .map_err(|_| ImageArgsError::BadWeighting(w))?,
            None => Weighting::default(),
        };
        let clean = parse_clean_args(
            clean,
            clean_gain,
            clean_threshold,
            clean_threshold_fraction,
            clean_max_iterations,
        )?;
        let output_types = match output_types {
            Some(types) => {
                let mut parsed = Vec::with_capacity(types.len());
                for t in types {
                    let output_type = ImageOutputType::from_str(&t.to_lowercase())
                        .map_err(|_| ImageArgsError::BadOutputType(t))?;
                    if !parsed.contains(&output_type) {
                        parsed.push(output_type);
                    }
                }
                Vec1::try_from_vec(parsed).map_err(|_| ImageArgsError::NoOutputTypes)?
            }
            None => default_output_types(),
        };
        #[cfg(not(feature = "plotting"))]
        if output_types.contains(&ImageOutputType::Png) {
            return Err(ImageArgsError::NoPlottingFeature.into());
        }
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let array_params = array_args.parse()?;
        let obs = observation_args.parse(&array_params)?;
        let coverage = make_coverage(&array_params, &obs)?;
        let sky = sky_model_args.parse(coverage.max_uv_length())?;

        let mut products = IMAGE_PRODUCTS.to_vec();
        if clean.is_some() {
            products.extend(CLEAN_PRODUCTS);
        }
        for name in &products {
            for file in image_filenames(&output_dir, name, &output_types) {
                can_write_to_file(&file)?;
            }
        }

        let mut printer = InfoPrinter::new("Imaging".into());
        printer.push_line(format!("Weighting: {weighting}").into());
        match &clean {
            Some(CleanParams {
                gain,
                max_iterations,
                threshold,
            }) => printer.push_block(vec![
                format!("Högbom CLEAN with gain {gain}").into(),
                format!("at most {max_iterations} iterations").into(),
                match threshold {
                    CleanThreshold::Absolute(t) => format!("down to {t} Jy/pixel"),
                    CleanThreshold::Fraction(f) => format!("down to {f} of the dirty peak"),
                }
                .into(),
            ]),
            None => printer.push_line("No deconvolution".into()),
        }
        printer.push_block(vec![
            format!("Writing to {}", output_dir.display()).into(),
            format!(
                "Formats: {}",
                output_types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
            )
            .into(),
            format!("Images: {}", products.join(", ")).into(),
        ]);
        printer.display();

        display_warnings();

        Ok(ImageParams {
            sky,
            coverage,
            weighting,
            clean,
            output_dir,
            output_types,
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
pub(super) enum ImageArgsError {
    #[error("Weighting '{0}' isn't recognised. Supported weightings: {}", *WEIGHTINGS_COMMA_SEPARATED)]
    BadWeighting(String),

    #[error("The CLEAN gain must be greater than 0 and at most 1; got {0}")]
    BadCleanGain(f64),

    #[error("The CLEAN threshold must be a non-negative number; got {0}")]
    BadCleanThreshold(f64),

    #[error("The fractional CLEAN threshold must be within 0 to 1; got {0}")]
    BadCleanThresholdFraction(f64),

    #[error("Only one of an absolute and a fractional CLEAN threshold may be given")]
    TwoCleanThresholds,

    #[error("Image format '{0}' isn't recognised. Supported formats: {}", *IMAGE_OUTPUT_EXTENSIONS)]
    BadOutputType(String),

    #[error("At least one image format must be given")]
    NoOutputTypes,

    #[cfg(not(feature = "plotting"))]
    #[error("observatory was not compiled with the \"plotting\" feature, so PNG images can't be written")]
    NoPlottingFeature,
}
