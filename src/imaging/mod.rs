// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reconstructing sky brightness from sampled visibilities.

mod clean;
mod error;
mod gridding;

pub use clean::{
    fit_clean_beam, hogbom_clean, restore, CleanBeam, CleanParams, CleanResult, CleanThreshold,
    StopReason,
};
pub use error::{DeconvolutionError, ImagingError};
pub use gridding::{UvGrid, Weighting};

use log::debug;
use ndarray::prelude::*;

use crate::{
    c64,
    constants::UV_GRID_MARGIN,
    fft::{fftshift, ifft2_inplace, ifftshift},
    sampling::Visibilities,
};

lazy_static::lazy_static! {
    pub(crate) static ref WEIGHTINGS_COMMA_SEPARATED: String = {
        use itertools::Itertools;
        use strum::IntoEnumIterator;
        Weighting::iter().join(", ")
    };
}

/// Transform a centred (u,v) grid into a centred image, keeping the real part.
pub(crate) fn grid_to_image(grid: ArrayView2<c64>) -> Array2<f64> {
    let mut shifted = ifftshift(grid);
    ifft2_inplace(&mut shifted);
    fftshift(shifted.view()).mapv(|v| v.re)
}

/// Choose an image cell size \[direction cosine\] so that the longest (u,v)
/// distance lands [`UV_GRID_MARGIN`] cells inside the edge of the grid.
///
/// The field's corners are kept within a direction cosine of 0.5 of the phase
/// centre, so short baselines (which would otherwise want a field beyond the
/// horizon) get a smaller cell and land further inside the grid. The same
/// field is used if there's no (u,v) extent at all (e.g. only the zero
/// spacing).
pub fn auto_cell_size(max_uv: f64, nx: usize, ny: usize) -> Result<f64, ImagingError> {
    let n = nx.min(ny);
    let min = 2 * (UV_GRID_MARGIN + 1);
    if n < min {
        return Err(ImagingError::ImageTooSmall { nx, ny, min });
    }
    if !(max_uv.is_finite() && max_uv >= 0.0) {
        return Err(ImagingError::BadMaxUv(max_uv));
    }
    let max_cell_size = 0.5 / ((nx / 2) as f64).hypot((ny / 2) as f64);
    let cell_size = if max_uv > 0.0 {
        let du = max_uv / ((n / 2 - UV_GRID_MARGIN) as f64);
        let cell_size = 1.0 / (n as f64 * du);
        if cell_size > max_cell_size {
            debug!(
                "Max (u,v) {max_uv:.3} is short for a {nx}x{ny} grid; capping the cell size at {max_cell_size:e}"
            );
            max_cell_size
        } else {
            cell_size
        }
    } else {
        max_cell_size
    };
    debug!("Automatic cell size for {nx}x{ny} with max (u,v) {max_uv:.3}: {cell_size:e}");
    Ok(cell_size)
}

/// Everything that comes out of imaging sampled visibilities.
#[derive(Clone, Debug)]
pub struct ImageProducts {
    pub grid: UvGrid,

    /// The sampled part of the (u,v) plane.
    pub sampling: Array2<f64>,

    pub psf: Array2<f64>,

    pub dirty: Array2<f64>,

    /// \[direction cosine\]
    pub cell_size: f64,
}

/// Grid visibilities and make the sampling image, PSF and dirty image.
pub fn make_images(
    vis: &Visibilities,
    nx: usize,
    ny: usize,
    cell_size: f64,
    weighting: Weighting,
) -> Result<ImageProducts, ImagingError> {
    if nx == 0 || ny == 0 {
        return Err(ImagingError::ImageTooSmall { nx, ny, min: 1 });
    }
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(ImagingError::BadCellSize(cell_size));
    }

    let grid = UvGrid::new(vis, nx, ny, cell_size, weighting);
    let sampling = grid.sampling_image();
    let psf = grid.psf();
    let dirty = grid.dirty_image();
    Ok(ImageProducts {
        grid,
        sampling,
        psf,
        dirty,
        cell_size,
    })
}
