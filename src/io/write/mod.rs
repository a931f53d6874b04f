// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing images, visibilities and baselines.
//!
//! Images are written with increasing `m` upwards and increasing `l` to the
//! right.

mod error;

pub use error::ImageWriteError;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, trace};
use ndarray::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::can_write_to_file;
use crate::{array::AntennaArray, baselines::Baseline, sampling::Visibilities};

/// All supported image formats.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutputType {
    #[strum(serialize = "txt")]
    Txt,
    #[strum(serialize = "png")]
    Png,
}

lazy_static::lazy_static! {
    pub(crate) static ref IMAGE_OUTPUT_EXTENSIONS: String = ImageOutputType::iter().join(", ");
}

impl ImageOutputType {
    /// Get the image type from a file's extension.
    pub fn from_path(file: &Path) -> Option<ImageOutputType> {
        file.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| ImageOutputType::from_str(&e.to_lowercase()).ok())
    }
}

/// Write an image. The format is determined by the file extension.
pub fn write_image(file: &Path, image: ArrayView2<f64>) -> Result<(), ImageWriteError> {
    let image_type =
        ImageOutputType::from_path(file).ok_or_else(|| ImageWriteError::UnknownImageExtension {
            file: file.to_path_buf(),
        })?;
    can_write_to_file(file)?;
    match image_type {
        ImageOutputType::Txt => write_image_txt(file, image)?,
        ImageOutputType::Png => write_image_png(file, image)?,
    }
    debug!("Wrote {}", file.display());
    Ok(())
}

/// Write an image as whitespace-separated text. Each line is a row of
/// constant `m`, from the top (largest `m`) down; columns run along `l`.
fn write_image_txt(file: &Path, image: ArrayView2<f64>) -> Result<(), ImageWriteError> {
    let mut out = BufWriter::new(File::create(file)?);
    for row in image.axis_iter(Axis(1)).rev() {
        let line = row.iter().map(|v| format!("{v:.9e}")).join(" ");
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn write_image_png(file: &Path, _image: ArrayView2<f64>) -> Result<(), ImageWriteError> {
    Err(ImageWriteError::NoPlottingFeature(file.to_path_buf()))
}

/// Write an image as a greyscale PNG, scaled so the minimum is black and the
/// maximum is white.
#[cfg(feature = "plotting")]
fn write_image_png(file: &Path, image: ArrayView2<f64>) -> Result<(), ImageWriteError> {
    use plotters::prelude::*;

    let to_error = |e: &dyn std::error::Error| ImageWriteError::Plotters {
        file: file.to_path_buf(),
        err: e.to_string(),
    };

    let (nx, ny) = image.dim();
    let (min, max) = image
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    trace!("PNG {}: min {min:e}, max {max:e}", file.display());

    let root = BitMapBackend::new(file, (nx as u32, ny as u32)).into_drawing_area();
    for ((x, y), &v) in image.indexed_iter() {
        let level = if range > 0.0 {
            ((v - min) / range * 255.0).round() as u8
        } else {
            0
        };
        root.draw_pixel(
            (x as i32, (ny - 1 - y) as i32),
            &RGBColor(level, level, level),
        )
        .map_err(|e| to_error(&e))?;
    }
    root.present().map_err(|e| to_error(&e))?;
    Ok(())
}

/// How a visibility appears in json output.
#[derive(Debug, Serialize)]
struct VisibilityRecord {
    u: f64,
    v: f64,
    w: f64,
    re: f64,
    im: f64,
    weight: f64,
    ant1: Option<usize>,
    ant2: Option<usize>,
    timestep: usize,
}

/// Write visibilities as a json array. (u,v,w) are in wavelengths.
pub fn write_visibilities_json(file: &Path, vis: &Visibilities) -> Result<(), ImageWriteError> {
    let records: Vec<VisibilityRecord> = vis
        .iter()
        .map(|(s, v)| VisibilityRecord {
            u: s.uvw.u,
            v: s.uvw.v,
            w: s.uvw.w,
            re: v.re,
            im: v.im,
            weight: s.weight,
            ant1: s.antennas.map(|a| a.0),
            ant2: s.antennas.map(|a| a.1),
            timestep: s.timestep,
        })
        .collect();
    write_json(file, &records)
}

/// How a baseline appears in json output.
#[derive(Debug, Serialize)]
struct BaselineRecord<'a> {
    ant1: usize,
    ant2: usize,
    name1: &'a str,
    name2: &'a str,
    east: f64,
    north: f64,
    height: f64,
    length: f64,
}

/// Write baselines as a json array. Vectors and lengths are in metres.
pub fn write_baselines_json(
    file: &Path,
    baselines: &[Baseline],
    array: &AntennaArray,
) -> Result<(), ImageWriteError> {
    let antennas = array.antennas();
    let records: Vec<BaselineRecord> = baselines
        .iter()
        .map(|bl| BaselineRecord {
            ant1: bl.ant1,
            ant2: bl.ant2,
            name1: &antennas[bl.ant1].name,
            name2: &antennas[bl.ant2].name,
            east: bl.enh.e,
            north: bl.enh.n,
            height: bl.enh.h,
            length: bl.length(),
        })
        .collect();
    write_json(file, &records)
}

fn write_json<T: Serialize>(file: &Path, value: &T) -> Result<(), ImageWriteError> {
    can_write_to_file(file)?;
    let mut out = BufWriter::new(File::create(file)?);
    serde_json::to_writer_pretty(&mut out, value).map_err(|err| ImageWriteError::Json {
        file: file.to_path_buf(),
        err,
    })?;
    out.flush()?;
    debug!("Wrote {}", file.display());
    Ok(())
}

/// The names of the files an image product is written to.
pub fn image_filenames(dir: &Path, name: &str, types: &[ImageOutputType]) -> Vec<PathBuf> {
    types
        .iter()
        .map(|t| dir.join(format!("{name}.{t}")))
        .collect()
}
