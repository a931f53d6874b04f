// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all observatory-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{
    baselines::BaselinesArgsError, common::CommonArgsError, image::ImageArgsError,
    vis_simulate::VisSimulateArgsError,
};
use crate::{
    array::ArrayError,
    imaging::ImagingError,
    io::{write::ImageWriteError, FileWriteError},
    params::{ImageError, VisSimulateError},
    sampling::{CoverageError, SamplingError},
    sky::SkyError,
};

/// The *only* publicly visible error from observatory. Each variant names the
/// stage of the pipeline that failed, so the user knows which inputs to look
/// at.
#[derive(Error, Debug)]
pub enum ObservatoryError {
    /// An error related to the baselines subcommand.
    #[error("{0}")]
    Baselines(String),

    /// An error related to vis-simulate.
    #[error("{0}")]
    VisSimulate(String),

    /// An error related to image.
    #[error("{0}")]
    Image(String),

    /// An error related to antenna layouts.
    #[error("{0}\n\nAntenna layouts are toml or json files with an [[antennas]] entry (east, north [metres]) per antenna.")]
    Array(String),

    /// An error related to sky models.
    #[error("{0}\n\nSky models are toml or json files with a [[components]] entry per component; each has a \"type\" (point, gaussian or disk), \"l\" and \"m\" [degrees] and \"flux\" [Jy].")]
    Sky(String),

    /// An error related to the (u,v,w) coverage of an observation.
    #[error("{0}\n\nCheck the array position, phase centre and observation time.")]
    Coverage(String),

    /// A numerical problem while sampling visibilities.
    #[error("{0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv).")]
    Sampling(String),

    /// An error related to gridding and imaging.
    #[error("{0}")]
    Imaging(String),

    /// An error related to writing output files.
    #[error("{0}")]
    Write(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<CommonArgsError> for ObservatoryError {
    fn from(e: CommonArgsError) -> Self {
        let s = e.to_string();
        match e {
            CommonArgsError::NoLayout
            | CommonArgsError::LatitudeInvalid(_)
            | CommonArgsError::LongitudeInvalid(_) => Self::Array(s),
            CommonArgsError::RaInvalid
            | CommonArgsError::DecInvalid
            | CommonArgsError::OnlyOneRAOrDec
            | CommonArgsError::HourInvalid(_)
            | CommonArgsError::HourAngle(_)
            | CommonArgsError::ZeroTimesteps => Self::Coverage(s),
            CommonArgsError::ZeroImageSize | CommonArgsError::CellSizeInvalid(_) => {
                Self::Imaging(s)
            }
        }
    }
}

impl From<BaselinesArgsError> for ObservatoryError {
    fn from(e: BaselinesArgsError) -> Self {
        Self::Baselines(e.to_string())
    }
}

impl From<VisSimulateArgsError> for ObservatoryError {
    fn from(e: VisSimulateArgsError) -> Self {
        Self::VisSimulate(e.to_string())
    }
}

impl From<ImageArgsError> for ObservatoryError {
    fn from(e: ImageArgsError) -> Self {
        Self::Image(e.to_string())
    }
}

impl From<VisSimulateError> for ObservatoryError {
    fn from(e: VisSimulateError) -> Self {
        match e {
            VisSimulateError::Sampling(e) => Self::from(e),
            VisSimulateError::Write(e) => Self::from(e),
        }
    }
}

impl From<ImageError> for ObservatoryError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Sampling(e) => Self::from(e),
            ImageError::Imaging(e) => Self::from(e),
            ImageError::Write(e) => Self::from(e),
        }
    }
}

// Library code errors.

impl From<ArrayError> for ObservatoryError {
    fn from(e: ArrayError) -> Self {
        let s = e.to_string();
        match e {
            ArrayError::FileDoesntExist(_)
            | ArrayError::UnknownFileType { .. }
            | ArrayError::Toml { .. }
            | ArrayError::Json { .. }
            | ArrayError::AntennaIndexOutOfRange { .. } => Self::Array(s),
            ArrayError::IO(e) => Self::from(e),
        }
    }
}

impl From<SkyError> for ObservatoryError {
    fn from(e: SkyError) -> Self {
        let s = e.to_string();
        match e {
            SkyError::BadCellSize(_) | SkyError::FieldTooLarge { .. } | SkyError::EmptyImage { .. } => {
                Self::Imaging(s)
            }
            SkyError::NonFinitePixel { .. }
            | SkyError::ComponentOutsideImage { .. }
            | SkyError::BadComponent { .. }
            | SkyError::FileDoesntExist(_)
            | SkyError::Toml { .. }
            | SkyError::Json { .. }
            | SkyError::UnknownFileType { .. } => Self::Sky(s),
            SkyError::IO(e) => Self::from(e),
        }
    }
}

impl From<CoverageError> for ObservatoryError {
    fn from(e: CoverageError) -> Self {
        Self::Coverage(e.to_string())
    }
}

impl From<SamplingError> for ObservatoryError {
    fn from(e: SamplingError) -> Self {
        Self::Sampling(e.to_string())
    }
}

impl From<ImagingError> for ObservatoryError {
    fn from(e: ImagingError) -> Self {
        Self::Imaging(e.to_string())
    }
}

impl From<ImageWriteError> for ObservatoryError {
    fn from(e: ImageWriteError) -> Self {
        let s = e.to_string();
        match e {
            ImageWriteError::FileWrite(e) => Self::from(e),
            ImageWriteError::IO(e) => Self::from(e),
            _ => Self::Write(s),
        }
    }
}

impl From<FileWriteError> for ObservatoryError {
    fn from(e: FileWriteError) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<std::io::Error> for ObservatoryError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
