// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.

use crate::c64;

/// Complex exponential. The argument is assumed to be purely imaginary.
///
/// This function doesn't actually use complex numbers; it just returns the real
/// and imag components from Euler's formula (i.e. e^{ix} = cos{x} + i sin{x}).
#[inline]
pub(crate) fn cexp(x: f64) -> c64 {
    let (im, re) = x.sin_cos();
    c64::new(re, im)
}

/// Evaluate a circular Gaussian with the given standard deviation and unit
/// peak at a squared radius.
#[inline]
pub(crate) fn gaussian(r_sq: f64, sigma: f64) -> f64 {
    (-r_sq / (2.0 * sigma * sigma)).exp()
}
