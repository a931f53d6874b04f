// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with antenna arrays.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("Antenna layout file '{0}' doesn't exist")]
    FileDoesntExist(PathBuf),

    #[error("Antenna layout file '{file}' doesn't have a recognised file extension! Valid extensions are: {valid}")]
    UnknownFileType { file: PathBuf, valid: String },

    #[error("Couldn't decode toml structure from {file}:\n{err}")]
    Toml { file: PathBuf, err: toml::de::Error },

    #[error("Couldn't decode json structure from {file}:\n{err}")]
    Json {
        file: PathBuf,
        err: serde_json::Error,
    },

    #[error("Antenna index {index} is out of range; there are only {num_antennas} antennas")]
    AntennaIndexOutOfRange { index: usize, num_antennas: usize },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
