// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate a radio interferometer.
//!
//! An antenna layout gives baselines; baselines projected towards a phase
//! centre over an observation give (u,v,w) coverage; sampling the Fourier
//! transform of a sky image over that coverage gives visibilities, and gridding
//! the visibilities back gives sampling, PSF and dirty images. The dirty image
//! can be deconvolved with Högbom CLEAN.
//!
//! The `observatory` binary exposes all of this; see [`Observatory`].

pub mod array;
pub mod baselines;
mod cli;
pub mod constants;
pub mod coord;
pub mod fft;
pub mod imaging;
pub(crate) mod io;
pub(crate) mod math;
mod params;
pub mod sampling;
pub mod sky;
pub mod time;

use crossbeam_utils::atomic::AtomicCell;

// Re-exports.
pub use cli::{Observatory, ObservatoryError};

#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex64;

lazy_static::lazy_static! {
    /// Are progress bars being drawn? This should only ever be enabled by CLI
    /// code.
    pub(crate) static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}
