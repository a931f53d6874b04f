// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Spatial-frequency coverage of an array, and sampling a sky's visibility
//! function over it.
//!
//! Coverage is either a static snapshot towards the zenith, or (when a phase
//! centre is given) Earth-rotation synthesis: the hour angle of the phase
//! centre is derived from the local sidereal angle at each timestamp, so the
//! projected baselines sweep out tracks in the (u,v) plane.

mod error;
#[cfg(test)]
mod tests;

pub use error::{CoverageError, SamplingError};

use std::num::NonZeroUsize;

use hifitime::{Duration, Epoch};
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::{
    baselines::{baselines_to_uvws, Baseline},
    c64,
    constants::{TAU, VEL_C},
    coord::{HADec, RADec, UVW},
    math::cexp,
    sky::SkyImage,
    time::local_sidereal_angle,
};

/// Everything about an observation needed to turn baselines into (u,v,w)
/// coverage.
#[derive(Clone, Debug)]
pub struct ObservationParams {
    /// \[radians\]
    pub array_latitude_rad: f64,

    /// \[radians\]
    pub array_longitude_rad: f64,

    /// The direction being tracked. If this is `None`, the array is pointed
    /// at the zenith and the coverage is a static snapshot.
    pub phase_centre: Option<RADec>,

    /// The times at which baselines are sampled.
    pub timestamps: Vec1<Epoch>,

    /// \[Hz\]
    pub freq_hz: f64,

    /// Include the (0,0,0) total-power sample.
    pub include_zero_spacing: bool,
}

impl ObservationParams {
    pub fn new(
        array_latitude_rad: f64,
        array_longitude_rad: f64,
        phase_centre: Option<RADec>,
        timestamps: Vec1<Epoch>,
        freq_hz: f64,
    ) -> Result<ObservationParams, CoverageError> {
        if !(freq_hz.is_finite() && freq_hz > 0.0) {
            return Err(CoverageError::BadFrequency(freq_hz));
        }
        Ok(ObservationParams {
            array_latitude_rad,
            array_longitude_rad,
            phase_centre,
            timestamps,
            freq_hz,
            include_zero_spacing: true,
        })
    }

    /// A static zenith snapshot at the equator.
    pub fn snapshot(epoch: Epoch, freq_hz: f64) -> Result<ObservationParams, CoverageError> {
        ObservationParams::new(0.0, 0.0, None, vec1::vec1![epoch], freq_hz)
    }

    /// \[metres\]
    pub fn wavelength(&self) -> f64 {
        VEL_C / self.freq_hz
    }
}

/// Regularly spaced timestamps, starting at `start`.
pub fn make_timestamps(
    start: Epoch,
    time_res: Duration,
    num_timesteps: NonZeroUsize,
) -> Result<Vec1<Epoch>, CoverageError> {
    let res_s = time_res.to_seconds();
    if num_timesteps.get() > 1 && !(res_s.is_finite() && res_s > 0.0) {
        return Err(CoverageError::BadTimeRes(res_s));
    }
    let mut timestamps = Vec1::new(start);
    for i in 1..num_timesteps.get() {
        timestamps.push(start + time_res * i as i64);
    }
    Ok(timestamps)
}

/// A single point of (u,v,w) coverage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UvSample {
    /// \[wavelengths\]
    pub uvw: UVW,

    /// The antennas whose baseline made this sample. Samples not associated
    /// with a baseline (e.g. the zero spacing) have none.
    pub antennas: Option<(usize, usize)>,

    pub timestep: usize,

    pub weight: f64,
}

/// All of the (u,v,w) samples of an observation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UvCoverage {
    samples: Vec<UvSample>,
    num_timesteps: usize,
}

impl UvCoverage {
    /// Project every baseline at every timestamp into wavelengths.
    pub fn new(
        baselines: &[Baseline],
        obs: &ObservationParams,
    ) -> Result<UvCoverage, CoverageError> {
        let wavelength = obs.wavelength();
        let lat = obs.array_latitude_rad;

        let timestamps: &[Epoch] = match obs.phase_centre {
            None => {
                if obs.timestamps.len() > 1 {
                    warn!("No phase centre was given, so the array is a static zenith snapshot; only the first of {} timesteps is used", obs.timestamps.len());
                }
                &obs.timestamps[..1]
            }
            Some(_) => &obs.timestamps,
        };

        let mut samples = Vec::with_capacity(baselines.len() * timestamps.len() + 1);
        if obs.include_zero_spacing {
            samples.push(UvSample {
                uvw: UVW::default(),
                antennas: None,
                timestep: 0,
                weight: 1.0,
            });
        }

        let mut num_below_horizon = 0;
        for (timestep, &epoch) in timestamps.iter().enumerate() {
            let pointing = match obs.phase_centre {
                None => HADec::zenith(lat),
                Some(radec) => {
                    let lst = local_sidereal_angle(epoch, obs.array_longitude_rad);
                    let hadec = radec.to_hadec(lst);
                    let azel = hadec.to_azel(lat);
                    trace!("Timestep {timestep}: LST {lst:.6} rad, {hadec}, {azel}");
                    if azel.el < 0.0 {
                        num_below_horizon += 1;
                        continue;
                    }
                    hadec
                }
            };

            let uvws = baselines_to_uvws(baselines, lat, pointing);
            samples.extend(baselines.iter().zip(uvws).map(|(bl, uvw)| UvSample {
                uvw: uvw / wavelength,
                antennas: Some(bl.ant_pair()),
                timestep,
                weight: 1.0,
            }));
        }

        if num_below_horizon > 0 {
            if num_below_horizon == timestamps.len() {
                return Err(CoverageError::BelowHorizon {
                    phase_centre: obs
                        .phase_centre
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                });
            }
            warn!("The phase centre is below the horizon for {num_below_horizon} of {} timesteps; those timesteps are skipped", timestamps.len());
        }

        debug!(
            "Made {} (u,v,w) samples from {} baselines over {} timesteps",
            samples.len(),
            baselines.len(),
            timestamps.len()
        );
        Ok(UvCoverage {
            samples,
            num_timesteps: timestamps.len(),
        })
    }

    /// Coverage of every frequency of an `nx` by `ny` grid whose image pixels
    /// are `cell_size` wide (direction cosine), i.e. a fully-sampled plane.
    pub fn full_grid(nx: usize, ny: usize, cell_size: f64) -> Result<UvCoverage, CoverageError> {
        if nx == 0 || ny == 0 || !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(CoverageError::BadGrid { nx, ny, cell_size });
        }
        let du = 1.0 / (nx as f64 * cell_size);
        let dv = 1.0 / (ny as f64 * cell_size);
        let mut samples = Vec::with_capacity(nx * ny);
        for x in 0..nx {
            for y in 0..ny {
                samples.push(UvSample {
                    uvw: UVW {
                        u: (x as f64 - (nx / 2) as f64) * du,
                        v: (y as f64 - (ny / 2) as f64) * dv,
                        w: 0.0,
                    },
                    antennas: None,
                    timestep: 0,
                    weight: 1.0,
                });
            }
        }
        Ok(UvCoverage {
            samples,
            num_timesteps: 1,
        })
    }

    pub fn samples(&self) -> &[UvSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn num_timesteps(&self) -> usize {
        self.num_timesteps
    }

    /// The largest (u,v) distance \[wavelengths\].
    pub fn max_uv_length(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.uvw.uv_length())
            .fold(0.0, f64::max)
    }
}

/// The visibility function of a sky, sampled over some coverage.
#[derive(Clone, Debug, PartialEq)]
pub struct Visibilities {
    pub samples: Vec<UvSample>,

    /// One value per sample \[Jy\].
    pub vis: Vec<c64>,
}

impl Visibilities {
    pub fn len(&self) -> usize {
        self.vis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vis.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UvSample, &c64)> {
        self.samples.iter().zip(self.vis.iter())
    }
}

/// Evaluate `V(u,v,w) = Σ I(l,m) exp(-2πi(ul + vm + w(n-1)))` at every sample.
pub fn sample_visibilities(
    sky: &SkyImage,
    coverage: &UvCoverage,
) -> Result<Visibilities, SamplingError> {
    sample_visibilities_inner(sky, coverage, None)
}

/// As [`sample_visibilities`], ticking a progress bar once per sample.
pub fn sample_visibilities_with_progress(
    sky: &SkyImage,
    coverage: &UvCoverage,
    progress: ProgressBar,
) -> Result<Visibilities, SamplingError> {
    let result = sample_visibilities_inner(sky, coverage, Some(progress.clone()));
    progress.finish();
    result
}

fn sample_visibilities_inner(
    sky: &SkyImage,
    coverage: &UvCoverage,
    progress: Option<ProgressBar>,
) -> Result<Visibilities, SamplingError> {
    let pixels = sky.emitting_pixels();
    debug!(
        "Sampling {} visibilities from {} emitting pixels",
        coverage.len(),
        pixels.len()
    );

    let dft = |s: &UvSample| -> c64 {
        let UVW { u, v, w } = s.uvw;
        pixels
            .iter()
            .map(|&(l, m, n_minus_1, brightness)| {
                cexp(-TAU * (u * l + v * m + w * n_minus_1)) * brightness
            })
            .sum()
    };
    let vis: Vec<c64> = match progress {
        Some(pb) => coverage
            .samples
            .par_iter()
            .progress_with(pb)
            .map(dft)
            .collect(),
        None => coverage.samples.par_iter().map(dft).collect(),
    };

    if let Some((index, _)) = vis
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.re.is_finite() && v.im.is_finite()))
    {
        let UVW { u, v, w } = coverage.samples[index].uvw;
        return Err(SamplingError::NonFiniteVisibility { index, u, v, w });
    }

    Ok(Visibilities {
        samples: coverage.samples.clone(),
        vis,
    })
}
