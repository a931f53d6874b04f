// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sky brightness: model components and the images they are rendered into.
//!
//! Images are indexed `[x, y]`, where x runs along the direction cosine `l`
//! (East) and y along `m` (North). The phase centre is at pixel
//! `(nx / 2, ny / 2)`, so pixel `(x, y)` sits at
//! `l = (x - nx/2) * cell`, `m = (y - ny/2) * cell`.
//!
//! Sky models can be read from toml or json files:
//!
//! ```toml
//! [[components]]
//! type = "point"
//! l = 0.0
//! m = 0.0
//! flux = 1.0
//!
//! [[components]]
//! type = "gaussian"
//! l = 0.5
//! m = -0.25
//! flux = 2.0
//! fwhm = 0.1
//! ```
//!
//! Offsets and sizes are in degrees; flux densities are in Jy.

mod error;

pub use error::SkyError;

use std::{path::Path, str::FromStr};

use log::{debug, trace};
use ndarray::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    array::{DataFileType, DATA_FILE_TYPES_COMMA_SEPARATED},
    constants::FWHM_TO_SIGMA,
    math::gaussian,
};

/// A grid of sky brightness \[Jy/pixel\].
#[derive(Clone, Debug, PartialEq)]
pub struct SkyImage {
    data: Array2<f64>,

    /// The width of a pixel in direction cosine.
    cell_size: f64,
}

impl SkyImage {
    /// Wrap a brightness grid. The cell size must be positive and the whole
    /// grid must lie above the horizon (`l² + m² < 1` at the corners).
    pub fn new(data: Array2<f64>, cell_size: f64) -> Result<SkyImage, SkyError> {
        let (nx, ny) = data.dim();
        validate_geometry(nx, ny, cell_size)?;
        if let Some(((x, y), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SkyError::NonFinitePixel { x, y });
        }
        Ok(SkyImage { data, cell_size })
    }

    /// An empty (all zero) sky.
    pub fn zeros(nx: usize, ny: usize, cell_size: f64) -> Result<SkyImage, SkyError> {
        validate_geometry(nx, ny, cell_size)?;
        Ok(SkyImage {
            data: Array2::zeros((nx, ny)),
            cell_size,
        })
    }

    pub fn data(&self) -> ArrayView2<f64> {
        self.data.view()
    }

    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The sum of all pixels \[Jy\].
    pub fn total_flux(&self) -> f64 {
        self.data.sum()
    }

    /// The (l,m) direction cosines of a pixel.
    pub fn lm(&self, x: usize, y: usize) -> (f64, f64) {
        let (nx, ny) = self.data.dim();
        pixel_to_lm(x, y, nx, ny, self.cell_size)
    }

    /// Every pixel with non-zero brightness, as `(l, m, n - 1, brightness)`.
    /// Zero pixels contribute nothing to visibilities, so skipping them is
    /// free.
    pub fn emitting_pixels(&self) -> Vec<(f64, f64, f64, f64)> {
        self.data
            .indexed_iter()
            .filter(|(_, &v)| v != 0.0)
            .map(|((x, y), &v)| {
                let (l, m) = self.lm(x, y);
                let n_minus_1 = (1.0 - l * l - m * m).sqrt() - 1.0;
                (l, m, n_minus_1, v)
            })
            .collect()
    }
}

pub(crate) fn pixel_to_lm(x: usize, y: usize, nx: usize, ny: usize, cell_size: f64) -> (f64, f64) {
    let l = (x as f64 - (nx / 2) as f64) * cell_size;
    let m = (y as f64 - (ny / 2) as f64) * cell_size;
    (l, m)
}

/// The pixel closest to (l,m), if it's inside the image.
fn nearest_pixel(l: f64, m: f64, nx: usize, ny: usize, cell_size: f64) -> Option<(usize, usize)> {
    let x = (l / cell_size).round() + (nx / 2) as f64;
    let y = (m / cell_size).round() + (ny / 2) as f64;
    if x >= 0.0 && y >= 0.0 && x < nx as f64 && y < ny as f64 {
        Some((x as usize, y as usize))
    } else {
        None
    }
}

fn validate_geometry(nx: usize, ny: usize, cell_size: f64) -> Result<(), SkyError> {
    if nx == 0 || ny == 0 {
        return Err(SkyError::EmptyImage { nx, ny });
    }
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(SkyError::BadCellSize(cell_size));
    }
    let half_l = (nx / 2) as f64 * cell_size;
    let half_m = (ny / 2) as f64 * cell_size;
    if half_l * half_l + half_m * half_m >= 1.0 {
        return Err(SkyError::FieldTooLarge { nx, ny, cell_size });
    }
    Ok(())
}

/// A single sky-model component. Positions are offsets from the phase centre.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SkyComponent {
    Point {
        /// East offset \[direction cosine\]
        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        l: f64,

        /// North offset \[direction cosine\]
        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        m: f64,

        /// \[Jy\]
        flux: f64,
    },

    Gaussian {
        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        l: f64,

        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        m: f64,

        flux: f64,

        /// Full width at half maximum \[radians\]
        #[serde(serialize_with = "radians_to_degrees")]
        #[serde(deserialize_with = "degrees_to_radians")]
        fwhm: f64,
    },

    /// A uniformly bright disk.
    Disk {
        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        l: f64,

        #[serde(serialize_with = "dir_cosine_to_degrees")]
        #[serde(deserialize_with = "degrees_to_dir_cosine")]
        m: f64,

        flux: f64,

        /// \[radians\]
        #[serde(serialize_with = "radians_to_degrees")]
        #[serde(deserialize_with = "degrees_to_radians")]
        radius: f64,
    },
}

fn dir_cosine_to_degrees<S: Serializer>(num: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(num.asin().to_degrees())
}

fn radians_to_degrees<S: Serializer>(num: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(num.to_degrees())
}

fn degrees_to_dir_cosine<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let num: f64 = Deserialize::deserialize(d)?;
    Ok(num.to_radians().sin())
}

fn degrees_to_radians<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let num: f64 = Deserialize::deserialize(d)?;
    Ok(num.to_radians())
}

impl SkyComponent {
    pub fn point(l: f64, m: f64, flux: f64) -> SkyComponent {
        SkyComponent::Point { l, m, flux }
    }

    pub fn lm(&self) -> (f64, f64) {
        match *self {
            SkyComponent::Point { l, m, .. }
            | SkyComponent::Gaussian { l, m, .. }
            | SkyComponent::Disk { l, m, .. } => (l, m),
        }
    }

    pub fn flux(&self) -> f64 {
        match *self {
            SkyComponent::Point { flux, .. }
            | SkyComponent::Gaussian { flux, .. }
            | SkyComponent::Disk { flux, .. } => flux,
        }
    }

    fn is_valid(&self) -> bool {
        let (l, m) = self.lm();
        let size_ok = match *self {
            SkyComponent::Point { .. } => true,
            SkyComponent::Gaussian { fwhm: s, .. } | SkyComponent::Disk { radius: s, .. } => {
                s.is_finite() && s >= 0.0
            }
        };
        l.is_finite() && m.is_finite() && self.flux().is_finite() && self.flux() >= 0.0 && size_ok
    }

    /// Add this component to `image`. The pixels it adds sum to its flux
    /// density. Extended components too small to cover a pixel centre are
    /// treated as points.
    fn render(&self, mut image: ArrayViewMut2<f64>, cell_size: f64) -> Option<()> {
        let (nx, ny) = image.dim();
        let (l0, m0) = self.lm();
        let flux = self.flux();

        let mut profile = match *self {
            SkyComponent::Point { .. } => None,
            SkyComponent::Gaussian { fwhm, .. } => {
                let sigma = fwhm * FWHM_TO_SIGMA;
                if sigma > 0.0 {
                    Some(Array2::from_shape_fn((nx, ny), |(x, y)| {
                        let (l, m) = pixel_to_lm(x, y, nx, ny, cell_size);
                        gaussian((l - l0).powi(2) + (m - m0).powi(2), sigma)
                    }))
                } else {
                    None
                }
            }
            SkyComponent::Disk { radius, .. } => {
                let r_sq_max = radius * radius;
                Some(Array2::from_shape_fn((nx, ny), |(x, y)| {
                    let (l, m) = pixel_to_lm(x, y, nx, ny, cell_size);
                    let r_sq = (l - l0).powi(2) + (m - m0).powi(2);
                    if r_sq <= r_sq_max {
                        1.0
                    } else {
                        0.0
                    }
                }))
            }
        };

        if let Some(p) = profile.as_mut() {
            let sum = p.sum();
            if sum > 0.0 && sum.is_finite() {
                *p *= flux / sum;
                image += &*p;
                return Some(());
            }
        }

        let (x, y) = nearest_pixel(l0, m0, nx, ny, cell_size)?;
        image[(x, y)] += flux;
        Some(())
    }
}

/// A collection of sky-model components.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyModel {
    #[serde(default)]
    pub components: Vec<SkyComponent>,
}

impl SkyModel {
    /// A single 1 Jy point source at the phase centre.
    pub fn unit_point_source() -> SkyModel {
        SkyModel {
            components: vec![SkyComponent::point(0.0, 0.0, 1.0)],
        }
    }

    /// Read a sky model from a toml or json file.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<SkyModel, SkyError> {
        let file = file.as_ref();
        debug!("Reading sky model from {}", file.display());
        if !file.exists() {
            return Err(SkyError::FileDoesntExist(file.to_path_buf()));
        }

        let file_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| DataFileType::from_str(&e).ok());
        let contents = std::fs::read_to_string(file)?;
        let model: SkyModel = match file_type {
            Some(DataFileType::Toml) => toml::from_str(&contents).map_err(|err| SkyError::Toml {
                file: file.to_path_buf(),
                err,
            })?,
            Some(DataFileType::Json) => {
                serde_json::from_str(&contents).map_err(|err| SkyError::Json {
                    file: file.to_path_buf(),
                    err,
                })?
            }
            None => {
                return Err(SkyError::UnknownFileType {
                    file: file.to_path_buf(),
                    valid: DATA_FILE_TYPES_COMMA_SEPARATED.clone(),
                })
            }
        };
        trace!("Sky model: {model:?}");
        Ok(model)
    }

    /// The total flux density of all components \[Jy\].
    pub fn total_flux(&self) -> f64 {
        self.components.iter().map(|c| c.flux()).sum()
    }

    /// Render all components onto a grid.
    pub fn render(&self, nx: usize, ny: usize, cell_size: f64) -> Result<SkyImage, SkyError> {
        let mut image = SkyImage::zeros(nx, ny, cell_size)?;
        for (index, comp) in self.components.iter().enumerate() {
            if !comp.is_valid() {
                return Err(SkyError::BadComponent { index });
            }
            let (l, m) = comp.lm();
            comp.render(image.data.view_mut(), cell_size)
                .ok_or(SkyError::ComponentOutsideImage {
                    index,
                    l_deg: l.asin().to_degrees(),
                    m_deg: m.asin().to_degrees(),
                })?;
        }
        Ok(image)
    }
}
