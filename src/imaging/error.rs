// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with imaging and deconvolution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Images must be at least {min}x{min} pixels; got {nx}x{ny}")]
    ImageTooSmall { nx: usize, ny: usize, min: usize },

    #[error("The image cell size must be positive and finite; got {0}")]
    BadCellSize(f64),

    #[error("The longest (u,v) distance ({0} wavelengths) isn't a usable number")]
    BadMaxUv(f64),
}

#[derive(Error, Debug)]
pub enum DeconvolutionError {
    #[error("The CLEAN gain must be in (0, 1]; got {0}")]
    BadGain(f64),

    #[error("The CLEAN threshold must be non-negative and finite; got {0}")]
    BadThreshold(f64),

    #[error("The dirty image ({dirty_nx}x{dirty_ny}) and PSF ({psf_nx}x{psf_ny}) have different shapes")]
    ShapeMismatch {
        dirty_nx: usize,
        dirty_ny: usize,
        psf_nx: usize,
        psf_ny: usize,
    },

    #[error("Cannot deconvolve an empty ({nx}x{ny}) image")]
    EmptyImage { nx: usize, ny: usize },

    #[error("The PSF peak ({0}) must be positive and finite")]
    BadPsfPeak(f64),

    #[error("The residual peak became non-finite at CLEAN iteration {iteration}")]
    NonFinitePeak { iteration: usize },

    #[error("The PSF main lobe never drops to half of its peak along the {axis} axis, so a clean beam can't be fitted")]
    NoHalfMaxCrossing { axis: char },
}
