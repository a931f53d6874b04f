// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `observatory` should do as many
calculations as possible in double precision.
 */

pub use std::f64::consts::{FRAC_PI_2, LN_2, PI, TAU};

/// Speed of light \[metres/second\].
pub const VEL_C: f64 = 299_792_458.0;

/// The ratio of the length of a solar day to a sidereal day.
pub const SOLAR_TO_SIDEREAL: f64 = 366.24 / 365.24;

/// The default latitude of an array \[degrees\].
pub const DEFAULT_ARRAY_LATITUDE_DEG: f64 = 0.0;

/// The default longitude of an array \[degrees\].
pub const DEFAULT_ARRAY_LONGITUDE_DEG: f64 = 0.0;

/// The default observing frequency \[Hz\]. This is the 21cm hydrogen line.
pub const DEFAULT_FREQ_HZ: f64 = 1.428e9;

/// The default number of days since the J2000 epoch of an observation.
pub const DEFAULT_DAY: i64 = 7305;

/// The default hour of the day of an observation.
pub const DEFAULT_HOUR: f64 = 12.0;

/// The default number of timesteps. One timestep means a static snapshot.
pub const DEFAULT_NUM_TIMESTEPS: usize = 1;

/// The default time resolution between timesteps \[seconds\].
pub const DEFAULT_TIME_RES_SECONDS: f64 = 600.0;

/// The default width and height of all images \[pixels\].
pub const DEFAULT_IMAGE_SIZE: usize = 128;

/// Baseline listings longer than this are only printed in full at debug
/// verbosity.
pub const MAX_BASELINES_TO_PRINT: usize = 100;

/// When automatically choosing a (u,v) cell size, the longest baseline is kept
/// this many cells away from the edge of the grid.
pub const UV_GRID_MARGIN: usize = 3;

/// The default CLEAN loop gain.
pub const DEFAULT_CLEAN_GAIN: f64 = 0.1;

/// The default maximum number of CLEAN iterations.
pub const DEFAULT_CLEAN_MAX_ITERATIONS: usize = 1000;

/// If no absolute CLEAN threshold is given, CLEAN stops when the residual peak
/// drops below this fraction of the initial dirty-image peak.
pub const DEFAULT_CLEAN_THRESHOLD_FRACTION: f64 = 0.01;

/// Clean-beam Gaussians are evaluated out to this many standard deviations.
pub const CLEAN_BEAM_CUTOFF_SIGMAS: f64 = 5.0;

/// Conversion factor from a Gaussian's full width at half maximum to its
/// standard deviation.
pub const FWHM_TO_SIGMA: f64 = 0.42466090014400953; // 1 / (2 * sqrt(2 ln 2))
