// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::IMAGE_OUTPUT_EXTENSIONS;
use crate::io::FileWriteError;

#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error("'{file}' doesn't have a recognised image extension! Supported formats: {}", *IMAGE_OUTPUT_EXTENSIONS)]
    UnknownImageExtension { file: PathBuf },

    #[cfg(not(feature = "plotting"))]
    #[error("observatory was not compiled with the \"plotting\" feature, so '{0}' can't be written.\nYou need to compile observatory with this feature to write PNG images.")]
    NoPlottingFeature(PathBuf),

    #[cfg(feature = "plotting")]
    #[error("Error from the plotters library while writing '{file}': {err}")]
    Plotters { file: PathBuf, err: String },

    #[error("Couldn't write json to '{file}': {err}")]
    Json {
        file: PathBuf,
        err: serde_json::Error,
    },

    #[error(transparent)]
    FileWrite(#[from] FileWriteError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
