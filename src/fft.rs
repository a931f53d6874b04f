// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional Fourier transforms and quadrant shifts.
//!
//! Transforms are separable: every row, then every column, is transformed
//! with `rustfft`. The inverse transform is normalised by `1 / (nx * ny)`, so
//! `ifft2(fft2(a)) == a`.
//!
//! `fftshift` moves the zero-frequency element from index 0 to index `n / 2`
//! on each axis; `ifftshift` undoes this.

use std::sync::Arc;

use ndarray::prelude::*;
use ndarray::Zip;
use rustfft::{Fft, FftPlanner};

use crate::c64;

/// Transform every lane of `data` along `axis` in place.
fn transform_lanes(data: &mut Array2<c64>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    Zip::from(data.lanes_mut(axis)).par_for_each(|mut lane| {
        let mut buffer = lane.to_vec();
        fft.process(&mut buffer);
        lane.iter_mut().zip(buffer).for_each(|(l, b)| *l = b);
    });
}

fn transform_2d(data: &mut Array2<c64>, inverse: bool) {
    let (nx, ny) = data.dim();
    if nx == 0 || ny == 0 {
        return;
    }
    let mut planner = FftPlanner::new();
    let (fft_x, fft_y) = if inverse {
        (planner.plan_fft_inverse(nx), planner.plan_fft_inverse(ny))
    } else {
        (planner.plan_fft_forward(nx), planner.plan_fft_forward(ny))
    };
    // Lanes along axis 1 have length ny.
    transform_lanes(data, Axis(1), &fft_y);
    transform_lanes(data, Axis(0), &fft_x);
}

/// Forward 2D FFT, in place. Unnormalised.
pub fn fft2_inplace(data: &mut Array2<c64>) {
    transform_2d(data, false);
}

/// Inverse 2D FFT, in place, normalised by the number of elements.
pub fn ifft2_inplace(data: &mut Array2<c64>) {
    transform_2d(data, true);
    let n = data.len();
    if n > 0 {
        let scale = 1.0 / n as f64;
        data.par_mapv_inplace(|v| v * scale);
    }
}

/// Forward 2D FFT. Unnormalised.
pub fn fft2(data: ArrayView2<c64>) -> Array2<c64> {
    let mut out = data.to_owned();
    fft2_inplace(&mut out);
    out
}

/// Inverse 2D FFT, normalised by the number of elements.
pub fn ifft2(data: ArrayView2<c64>) -> Array2<c64> {
    let mut out = data.to_owned();
    ifft2_inplace(&mut out);
    out
}

/// Move the zero-frequency element to the centre `(nx / 2, ny / 2)`.
pub fn fftshift<T: Clone>(data: ArrayView2<T>) -> Array2<T> {
    let (nx, ny) = data.dim();
    Array2::from_shape_fn((nx, ny), |(x, y)| {
        data[((x + nx - nx / 2) % nx, (y + ny - ny / 2) % ny)].clone()
    })
}

/// The inverse of [`fftshift`]: move the centre element to `(0, 0)`.
pub fn ifftshift<T: Clone>(data: ArrayView2<T>) -> Array2<T> {
    let (nx, ny) = data.dim();
    Array2::from_shape_fn((nx, ny), |(x, y)| {
        data[((x + nx / 2) % nx, (y + ny / 2) % ny)].clone()
    })
}
