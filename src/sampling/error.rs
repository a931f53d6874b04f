// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with (u,v) coverage and visibility sampling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("The observing frequency must be positive and finite; got {0} Hz")]
    BadFrequency(f64),

    #[error("The time resolution must be positive; got {0} s")]
    BadTimeRes(f64),

    #[error("The phase centre {phase_centre} is below the horizon at every timestep")]
    BelowHorizon { phase_centre: String },

    #[error("Cannot make a dense (u,v) grid with cell size {cell_size} and dimensions {nx}x{ny}")]
    BadGrid { nx: usize, ny: usize, cell_size: f64 },
}

#[derive(Error, Debug)]
pub enum SamplingError {
    #[error("Visibility {index} at (u,v,w) = ({u}, {v}, {w}) is not finite")]
    NonFiniteVisibility {
        index: usize,
        u: f64,
        v: f64,
        w: f64,
    },
}
