// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with sky models and sky images.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyError {
    #[error("The image cell size must be positive and finite; got {0}")]
    BadCellSize(f64),

    #[error("A {nx}x{ny} image with a cell size of {cell_size} extends beyond the horizon; use a smaller cell size or fewer pixels")]
    FieldTooLarge { nx: usize, ny: usize, cell_size: f64 },

    #[error("Cannot make an image with a zero dimension ({nx}x{ny})")]
    EmptyImage { nx: usize, ny: usize },

    #[error("Sky image pixel ({x},{y}) is not finite")]
    NonFinitePixel { x: usize, y: usize },

    #[error("Sky-model component {index} at ({l_deg}°, {m_deg}°) falls outside the image")]
    ComponentOutsideImage { index: usize, l_deg: f64, m_deg: f64 },

    #[error("Sky-model component {index} has a non-finite or negative size or flux density")]
    BadComponent { index: usize },

    #[error("Sky-model file '{0}' doesn't exist")]
    FileDoesntExist(PathBuf),

    #[error("Couldn't parse sky-model file '{file}' as toml: {err}")]
    Toml {
        file: PathBuf,
        err: toml::de::Error,
    },

    #[error("Couldn't parse sky-model file '{file}' as json: {err}")]
    Json {
        file: PathBuf,
        err: serde_json::Error,
    },

    #[error("Sky-model file '{file}' has an unrecognised extension; valid extensions are: {valid}")]
    UnknownFileType { file: PathBuf, valid: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
