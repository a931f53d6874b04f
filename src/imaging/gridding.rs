// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gridding visibilities onto a regular (u,v) plane.
//!
//! The grid is `nx` by `ny` with the zero frequency at `(nx / 2, ny / 2)`. A
//! sample at (u,v) lands in the nearest cell; its Hermitian conjugate is
//! gridded at (-u,-v) too, because the sky is real. The grid is periodic, so
//! on even axes a sample on the Nyquist edge and its conjugate share the edge
//! cell. Cells no sample lands in stay zero.

use log::{debug, warn};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{c64, sampling::Visibilities};

/// How samples landing in the same cell are combined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Each sampled cell counts equally; its value is the mean of its
    /// samples.
    #[default]
    Uniform,

    /// Each sample counts equally; densely-sampled cells carry more weight.
    Natural,
}

/// Visibilities on a regular grid.
#[derive(Clone, Debug)]
pub struct UvGrid {
    /// Gridded visibilities \[Jy\].
    pub values: Array2<c64>,

    /// The weight of each cell. Zero where nothing was sampled.
    pub weights: Array2<f64>,

    /// The cell widths \[wavelengths\].
    pub du: f64,
    pub dv: f64,

    /// The number of samples that fell outside the grid (along with their
    /// conjugates).
    pub num_dropped: usize,

    pub weighting: Weighting,
}

/// The cell a (u,v) coordinate lands in, if it's on the grid.
fn cell_index(u: f64, v: f64, du: f64, dv: f64, nx: usize, ny: usize) -> Option<(usize, usize)> {
    Some((axis_index(u / du, nx)?, axis_index(v / dv, ny)?))
}

/// The index of the cell `offset` cells from the centre of an axis `n` cells
/// long. On even axes the positive Nyquist frequency is the same cell as the
/// negative one, index 0.
fn axis_index(offset: f64, n: usize) -> Option<usize> {
    let i = offset.round() + (n / 2) as f64;
    if i >= 0.0 && i < n as f64 {
        Some(i as usize)
    } else if n % 2 == 0 && i == n as f64 {
        Some(0)
    } else {
        None
    }
}

impl UvGrid {
    /// Grid visibilities for an image of `nx` by `ny` pixels, each
    /// `cell_size` wide (direction cosine).
    pub fn new(
        vis: &Visibilities,
        nx: usize,
        ny: usize,
        cell_size: f64,
        weighting: Weighting,
    ) -> UvGrid {
        let du = 1.0 / (nx as f64 * cell_size);
        let dv = 1.0 / (ny as f64 * cell_size);

        let mut sums: Array2<c64> = Array2::zeros((nx, ny));
        let mut weights: Array2<f64> = Array2::zeros((nx, ny));
        let mut num_dropped = 0;
        for (sample, &v) in vis.iter() {
            let u = sample.uvw.u;
            let w = sample.weight;
            let primary = cell_index(u, sample.uvw.v, du, dv, nx, ny);
            let conjugate = cell_index(-u, -sample.uvw.v, du, dv, nx, ny);
            if primary.is_none() && conjugate.is_none() {
                num_dropped += 1;
                continue;
            }
            if let Some(i) = primary {
                sums[i] += v * w;
                weights[i] += w;
            }
            if let Some(i) = conjugate {
                sums[i] += v.conj() * w;
                weights[i] += w;
            }
        }
        if num_dropped > 0 {
            warn!("{num_dropped} visibilities fell outside the (u,v) grid and were dropped");
        }

        let num_sampled = weights.iter().filter(|&&w| w > 0.0).count();
        let total_weight = weights.sum();
        debug!(
            "Gridded {} visibilities into {num_sampled} of {} cells ({weighting} weighting)",
            vis.len() - num_dropped,
            nx * ny
        );

        let values = match weighting {
            Weighting::Uniform => {
                let mut values = sums;
                values.zip_mut_with(&weights, |s, &w| {
                    if w > 0.0 {
                        *s /= w
                    }
                });
                weights.mapv_inplace(|w| if w > 0.0 { 1.0 } else { 0.0 });
                values
            }
            Weighting::Natural => {
                // Scale so that natural and uniform weighting agree when every
                // cell holds one sample.
                if total_weight > 0.0 {
                    let scale = num_sampled as f64 / total_weight;
                    weights *= scale;
                    sums * scale
                } else {
                    sums
                }
            }
        };

        UvGrid {
            values,
            weights,
            du,
            dv,
            num_dropped,
            weighting,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// The number of cells that hold at least one sample.
    pub fn num_sampled_cells(&self) -> usize {
        self.weights.iter().filter(|&&w| w > 0.0).count()
    }

    /// 1 where the plane was sampled, 0 elsewhere.
    pub fn sampling_image(&self) -> Array2<f64> {
        self.weights.mapv(|w| if w > 0.0 { 1.0 } else { 0.0 })
    }

    /// The point-spread function (dirty beam): the image of the sampling
    /// weights. Its peak is at `(nx / 2, ny / 2)`.
    pub fn psf(&self) -> Array2<f64> {
        super::grid_to_image(self.weights.mapv(|w| c64::new(w, 0.0)).view())
    }

    /// The dirty image \[Jy/pixel\].
    pub fn dirty_image(&self) -> Array2<f64> {
        super::grid_to_image(self.values.view())
    }
}
