// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Högbom CLEAN deconvolution and restoration with a Gaussian clean beam.

use log::{debug, trace};
use ndarray::{prelude::*, Zip};

use super::DeconvolutionError;
use crate::{
    constants::{
        CLEAN_BEAM_CUTOFF_SIGMAS, DEFAULT_CLEAN_GAIN, DEFAULT_CLEAN_MAX_ITERATIONS,
        DEFAULT_CLEAN_THRESHOLD_FRACTION, FWHM_TO_SIGMA,
    },
    math::gaussian,
};

/// When CLEAN should consider the residual clean enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanThreshold {
    /// \[Jy/pixel\]
    Absolute(f64),

    /// A fraction of the dirty image's peak.
    Fraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanParams {
    /// The fraction of the peak removed each iteration.
    pub gain: f64,

    pub max_iterations: usize,

    pub threshold: CleanThreshold,
}

impl Default for CleanParams {
    fn default() -> Self {
        CleanParams {
            gain: DEFAULT_CLEAN_GAIN,
            max_iterations: DEFAULT_CLEAN_MAX_ITERATIONS,
            threshold: CleanThreshold::Fraction(DEFAULT_CLEAN_THRESHOLD_FRACTION),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The residual peak dropped below the threshold.
    Threshold,

    /// The iteration limit was reached first.
    MaxIterations,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Threshold => write!(f, "residual peak below threshold"),
            StopReason::MaxIterations => write!(f, "maximum iterations reached"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanResult {
    /// CLEAN components \[Jy\].
    pub model: Array2<f64>,

    /// What's left of the dirty image \[Jy/pixel\].
    pub residual: Array2<f64>,

    pub iterations: usize,

    pub stop_reason: StopReason,

    /// The absolute threshold that was used \[Jy/pixel\].
    pub threshold: f64,
}

/// The position and value of the largest-magnitude pixel.
fn find_peak(image: ArrayView2<f64>) -> ((usize, usize), f64) {
    image
        .indexed_iter()
        .fold(((0, 0), 0.0), |(best_pos, best), (pos, &v)| {
            // NaN always wins, so it can be detected.
            if v.is_nan() || (!best.is_nan() && v.abs() > best.abs()) {
                (pos, v)
            } else {
                (best_pos, best)
            }
        })
}

/// Add `scale` times `kernel` to `target`, with the kernel's centre
/// `(nx / 2, ny / 2)` moved to `pos`. The kernel wraps around the edges.
fn add_shifted(
    mut target: ArrayViewMut2<f64>,
    kernel: ArrayView2<f64>,
    pos: (usize, usize),
    scale: f64,
) {
    let (nx, ny) = target.dim();
    let (cx, cy) = (nx / 2, ny / 2);
    Zip::indexed(&mut target).par_for_each(|(x, y), t| {
        let kx = (x + nx + cx - pos.0) % nx;
        let ky = (y + ny + cy - pos.1) % ny;
        *t += scale * kernel[(kx, ky)];
    });
}

/// Deconvolve `psf` from `dirty` with Högbom's algorithm.
///
/// Each iteration finds the largest-magnitude residual pixel, records
/// `gain * peak / psf_peak` as a component there, and subtracts the PSF scaled
/// by that component. The PSF is centred at `(nx / 2, ny / 2)` and is shifted
/// circularly.
pub fn hogbom_clean(
    dirty: ArrayView2<f64>,
    psf: ArrayView2<f64>,
    params: &CleanParams,
) -> Result<CleanResult, DeconvolutionError> {
    let CleanParams {
        gain,
        max_iterations,
        threshold,
    } = *params;
    if !(gain > 0.0 && gain <= 1.0) {
        return Err(DeconvolutionError::BadGain(gain));
    }
    let (nx, ny) = dirty.dim();
    let (psf_nx, psf_ny) = psf.dim();
    if (nx, ny) != (psf_nx, psf_ny) {
        return Err(DeconvolutionError::ShapeMismatch {
            dirty_nx: nx,
            dirty_ny: ny,
            psf_nx,
            psf_ny,
        });
    }
    if nx == 0 || ny == 0 {
        return Err(DeconvolutionError::EmptyImage { nx, ny });
    }
    let psf_peak = psf[(nx / 2, ny / 2)];
    if !(psf_peak.is_finite() && psf_peak > 0.0) {
        return Err(DeconvolutionError::BadPsfPeak(psf_peak));
    }

    let mut residual = dirty.to_owned();
    let mut model = Array2::zeros((nx, ny));

    let (_, initial_peak) = find_peak(residual.view());
    if !initial_peak.is_finite() {
        return Err(DeconvolutionError::NonFinitePeak { iteration: 0 });
    }
    let threshold = match threshold {
        CleanThreshold::Absolute(t) => t,
        CleanThreshold::Fraction(f) => f * initial_peak.abs(),
    };
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(DeconvolutionError::BadThreshold(threshold));
    }
    debug!("CLEAN: initial peak {initial_peak:e}, threshold {threshold:e}, gain {gain}");

    let mut iterations = 0;
    let stop_reason = loop {
        let (pos, peak) = find_peak(residual.view());
        if !peak.is_finite() {
            return Err(DeconvolutionError::NonFinitePeak {
                iteration: iterations,
            });
        }
        if peak.abs() <= threshold {
            break StopReason::Threshold;
        }
        if iterations == max_iterations {
            break StopReason::MaxIterations;
        }

        let component = gain * peak / psf_peak;
        trace!("CLEAN iteration {iterations}: {component:e} at {pos:?}");
        model[pos] += component;
        add_shifted(residual.view_mut(), psf, pos, -component);
        iterations += 1;
    };
    debug!("CLEAN stopped after {iterations} iterations: {stop_reason}");

    Ok(CleanResult {
        model,
        residual,
        iterations,
        stop_reason,
        threshold,
    })
}

/// An elliptical Gaussian aligned with the image axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanBeam {
    /// Full widths at half maximum \[pixels\].
    pub fwhm_x: f64,
    pub fwhm_y: f64,
}

impl CleanBeam {
    pub fn sigma_x(&self) -> f64 {
        self.fwhm_x * FWHM_TO_SIGMA
    }

    pub fn sigma_y(&self) -> f64 {
        self.fwhm_y * FWHM_TO_SIGMA
    }

    /// The beam centred at `(nx / 2, ny / 2)`, normalised to a unit sum.
    /// Values beyond [`CLEAN_BEAM_CUTOFF_SIGMAS`] are zero.
    pub fn image(&self, nx: usize, ny: usize) -> Array2<f64> {
        let (sx, sy) = (self.sigma_x(), self.sigma_y());
        let (cx, cy) = ((nx / 2) as f64, (ny / 2) as f64);
        let mut beam = Array2::from_shape_fn((nx, ny), |(x, y)| {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx.abs() > CLEAN_BEAM_CUTOFF_SIGMAS * sx || dy.abs() > CLEAN_BEAM_CUTOFF_SIGMAS * sy
            {
                0.0
            } else {
                // Scale one axis so a single circular Gaussian serves both.
                gaussian(dx * dx + (dy * sx / sy).powi(2), sx)
            }
        });
        let sum = beam.sum();
        beam /= sum;
        beam
    }
}

/// The distance from the peak at which a 1D profile first drops to half of
/// the peak, by linear interpolation \[pixels\].
fn half_max_distance(profile: impl Iterator<Item = f64>, peak: f64) -> Option<f64> {
    let half = peak / 2.0;
    let mut previous = peak;
    for (i, v) in profile.enumerate() {
        if v <= half {
            let frac = (previous - half) / (previous - v);
            return Some(i as f64 + frac);
        }
        previous = v;
    }
    None
}

/// Fit a Gaussian to the main lobe of a centred PSF, using its half-maximum
/// widths along the x and y axes through the centre.
pub fn fit_clean_beam(psf: ArrayView2<f64>) -> Result<CleanBeam, DeconvolutionError> {
    let (nx, ny) = psf.dim();
    if nx == 0 || ny == 0 {
        return Err(DeconvolutionError::EmptyImage { nx, ny });
    }
    let (cx, cy) = (nx / 2, ny / 2);
    let peak = psf[(cx, cy)];
    if !(peak.is_finite() && peak > 0.0) {
        return Err(DeconvolutionError::BadPsfPeak(peak));
    }

    let row = psf.row(cx);
    let col = psf.column(cy);
    let fwhm = |line: ArrayView1<f64>, c: usize, axis: char| {
        let up = half_max_distance(line.iter().skip(c + 1).copied(), peak);
        let down = half_max_distance(line.iter().take(c).rev().copied(), peak);
        match (up, down) {
            (Some(u), Some(d)) => Ok(u + d),
            // At an image edge, assume symmetry.
            (Some(u), None) if c == 0 => Ok(2.0 * u),
            _ => Err(DeconvolutionError::NoHalfMaxCrossing { axis }),
        }
    };
    let beam = CleanBeam {
        fwhm_x: fwhm(col, cx, 'x')?,
        fwhm_y: fwhm(row, cy, 'y')?,
    };
    debug!(
        "Clean beam FWHM: {:.3} x {:.3} pixels",
        beam.fwhm_x, beam.fwhm_y
    );
    Ok(beam)
}

/// Convolve CLEAN components with a clean beam and add the residual.
pub fn restore(
    model: ArrayView2<f64>,
    residual: ArrayView2<f64>,
    beam: &CleanBeam,
) -> Array2<f64> {
    let (nx, ny) = model.dim();
    let kernel = beam.image(nx, ny);
    let mut restored = residual.to_owned();
    for (pos, &component) in model.indexed_iter() {
        if component != 0.0 {
            add_shifted(restored.view_mut(), kernel.view(), pos, component);
        }
    }
    restored
}
