// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Antennas and the arrays they form.
//!
//! Antenna positions are East, North, Height coordinates in a ground-plane
//! frame shared by the whole array. Layouts can be read from toml or json
//! files:
//!
//! ```toml
//! [[antennas]]
//! name = "A0"
//! east = 0.0
//! north = 0.0
//!
//! [[antennas]]
//! name = "A1"
//! east = 10.0
//! north = 0.0
//! height = 0.5
//! dish_diameter = 6.0
//! ```

mod error;

pub use error::ArrayError;

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::coord::ENH;

lazy_static::lazy_static! {
    pub(crate) static ref DATA_FILE_TYPES_COMMA_SEPARATED: String = DataFileType::iter().join(", ");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(crate) enum DataFileType {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// A single antenna (a.k.a. dish or station).
#[derive(Clone, Debug, PartialEq)]
pub struct Antenna {
    pub name: String,

    /// The position of the antenna in the array's ground-plane frame.
    pub position: ENH,

    /// The diameter of the antenna's dish \[metres\], if it has one.
    pub dish_diameter: Option<f64>,
}

impl Antenna {
    pub fn new<S: Into<String>>(name: S, position: ENH) -> Antenna {
        Antenna {
            name: name.into(),
            position,
            dish_diameter: None,
        }
    }
}

/// How antennas appear in layout files.
#[derive(Debug, Serialize, Deserialize)]
struct AntennaEntry {
    #[serde(default)]
    name: Option<String>,
    east: f64,
    north: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    dish_diameter: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    antennas: Vec<AntennaEntry>,
}

/// Something about an array that isn't fatal, but the user should know about.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayWarning {
    /// This antenna's position isn't finite; it will be flagged.
    NonFinitePosition { index: usize, name: String },

    /// These two antennas share a position, so their baseline has zero length.
    Coincident { i: usize, j: usize },

    /// The dish diameter isn't a positive number.
    BadDishDiameter { index: usize, diameter: f64 },

    /// There aren't enough usable antennas to form any baselines.
    TooFewAntennas { num_usable: usize },
}

impl fmt::Display for ArrayWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArrayWarning::NonFinitePosition { index, name } => write!(
                f,
                "Antenna {index} ('{name}') has a non-finite position; it is flagged and won't form baselines"
            ),
            ArrayWarning::Coincident { i, j } => {
                write!(f, "Antennas {i} and {j} share a position; their baseline has zero length")
            }
            ArrayWarning::BadDishDiameter { index, diameter } => {
                write!(f, "Antenna {index} has a non-positive dish diameter ({diameter})")
            }
            ArrayWarning::TooFewAntennas { num_usable } => write!(
                f,
                "Only {num_usable} usable antenna(s); at least 2 are needed to form baselines"
            ),
        }
    }
}

/// Which antennas should not be used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntennaFlags {
    total_num_antennas: usize,
    flagged: HashSet<usize>,
}

impl AntennaFlags {
    /// Flag the antennas at the given indices. Indices beyond the array are
    /// ignored.
    pub fn new(total_num_antennas: usize, mut flagged: HashSet<usize>) -> AntennaFlags {
        flagged.retain(|&i| i < total_num_antennas);
        AntennaFlags {
            total_num_antennas,
            flagged,
        }
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }

    pub fn flagged_indices(&self) -> Vec<usize> {
        self.flagged.iter().copied().sorted().collect()
    }

    pub fn num_unflagged(&self) -> usize {
        self.total_num_antennas - self.flagged.len()
    }

    /// The indices of antennas that may form baselines, in ascending order.
    pub fn unflagged_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.total_num_antennas).filter(|i| !self.flagged.contains(i))
    }
}

/// A collection of antennas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AntennaArray {
    antennas: Vec<Antenna>,
}

impl AntennaArray {
    pub fn new(antennas: Vec<Antenna>) -> AntennaArray {
        AntennaArray { antennas }
    }

    /// Make an array from positions alone. Antennas are named by their index.
    pub fn from_positions<I: IntoIterator<Item = ENH>>(positions: I) -> AntennaArray {
        AntennaArray {
            antennas: positions
                .into_iter()
                .enumerate()
                .map(|(i, p)| Antenna::new(format!("A{i}"), p))
                .collect(),
        }
    }

    /// Read an antenna layout from a toml or json file.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<AntennaArray, ArrayError> {
        let file = file.as_ref();
        debug!("Reading antenna layout from {}", file.display());
        if !file.exists() {
            return Err(ArrayError::FileDoesntExist(file.to_path_buf()));
        }

        let file_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| DataFileType::from_str(&e).ok());
        let contents = std::fs::read_to_string(file)?;
        let layout: LayoutFile = match file_type {
            Some(DataFileType::Toml) => {
                toml::from_str(&contents).map_err(|err| ArrayError::Toml {
                    file: file.to_path_buf(),
                    err,
                })?
            }
            Some(DataFileType::Json) => {
                serde_json::from_str(&contents).map_err(|err| ArrayError::Json {
                    file: file.to_path_buf(),
                    err,
                })?
            }
            None => {
                return Err(ArrayError::UnknownFileType {
                    file: PathBuf::from(file),
                    valid: DATA_FILE_TYPES_COMMA_SEPARATED.clone(),
                })
            }
        };
        trace!("Layout file contents: {layout:?}");

        let antennas = layout
            .antennas
            .into_iter()
            .enumerate()
            .map(|(i, a)| Antenna {
                name: a.name.unwrap_or_else(|| format!("A{i}")),
                position: ENH::new(a.east, a.north, a.height),
                dish_diameter: a.dish_diameter,
            })
            .collect();
        Ok(AntennaArray { antennas })
    }

    pub fn antennas(&self) -> &[Antenna] {
        &self.antennas
    }

    pub fn positions(&self) -> impl Iterator<Item = ENH> + '_ {
        self.antennas.iter().map(|a| a.position)
    }

    pub fn len(&self) -> usize {
        self.antennas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }

    /// Move a single antenna.
    pub fn set_position(&mut self, index: usize, position: ENH) -> Result<(), ArrayError> {
        let num_antennas = self.antennas.len();
        match self.antennas.get_mut(index) {
            Some(a) => {
                a.position = position;
                Ok(())
            }
            None => Err(ArrayError::AntennaIndexOutOfRange {
                index,
                num_antennas,
            }),
        }
    }

    /// Flag antennas that can't be used. Currently this is any antenna with a
    /// non-finite position.
    pub fn flags(&self) -> AntennaFlags {
        let flagged = self
            .antennas
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.position.is_finite())
            .map(|(i, _)| i)
            .collect();
        AntennaFlags::new(self.antennas.len(), flagged)
    }

    /// Inspect the array for anything the user should be warned about.
    pub fn warnings(&self) -> Vec<ArrayWarning> {
        let mut warnings = vec![];
        for (index, a) in self.antennas.iter().enumerate() {
            if !a.position.is_finite() {
                warnings.push(ArrayWarning::NonFinitePosition {
                    index,
                    name: a.name.clone(),
                });
            }
            match a.dish_diameter {
                Some(d) if !(d.is_finite() && d > 0.0) => {
                    warnings.push(ArrayWarning::BadDishDiameter { index, diameter: d })
                }
                _ => (),
            }
        }

        let flags = self.flags();
        let unflagged: Vec<usize> = flags.unflagged_indices().collect();
        for (pos, &i) in unflagged.iter().enumerate() {
            for &j in &unflagged[pos + 1..] {
                if self.antennas[i].position == self.antennas[j].position {
                    warnings.push(ArrayWarning::Coincident { i, j });
                }
            }
        }

        if unflagged.len() < 2 {
            warnings.push(ArrayWarning::TooFewAntennas {
                num_usable: unflagged.len(),
            });
        }

        warnings
    }
}
