// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (u,v,w) coordinates.

use serde::{Deserialize, Serialize};

use super::{HADec, XyzBaseline};

/// The (u,v,w) coordinates of a baseline. These are in metres until divided by
/// a wavelength, after which they are dimensionless (i.e. "in wavelengths").
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct UVW {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl UVW {
    /// Convert an [`XyzBaseline`] to [`UVW`], given the phase centre.
    ///
    /// This is Equation 4.1 of: Interferometry and Synthesis in Radio
    /// Astronomy, Third Edition, Section 4: Geometrical Relationships,
    /// Polarimetry, and the Measurement Equation.
    pub fn from_xyz(xyz: XyzBaseline, phase_centre: HADec) -> UVW {
        let (s_ha, c_ha) = phase_centre.ha.sin_cos();
        let (s_dec, c_dec) = phase_centre.dec.sin_cos();
        UVW::from_xyz_inner(xyz, s_ha, c_ha, s_dec, c_dec)
    }

    /// Convert an [`XyzBaseline`] to [`UVW`], given the phase centre's sines
    /// and cosines. This is useful when many baselines share a phase centre.
    pub fn from_xyz_inner(xyz: XyzBaseline, s_ha: f64, c_ha: f64, s_dec: f64, c_dec: f64) -> UVW {
        UVW {
            u: s_ha * xyz.x + c_ha * xyz.y,
            v: -s_dec * c_ha * xyz.x + s_dec * s_ha * xyz.y + c_dec * xyz.z,
            w: c_dec * c_ha * xyz.x - c_dec * s_ha * xyz.y + s_dec * xyz.z,
        }
    }

    /// The length of the (u,v) part of this vector.
    pub fn uv_length(&self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Is this the zero spacing, i.e. (0,0,0)?
    pub fn is_zero(&self) -> bool {
        self.u == 0.0 && self.v == 0.0 && self.w == 0.0
    }
}

impl std::ops::Div<f64> for UVW {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        UVW {
            u: self.u / rhs,
            v: self.v / rhs,
            w: self.w / rhs,
        }
    }
}

impl std::ops::Neg for UVW {
    type Output = Self;

    fn neg(self) -> Self {
        UVW {
            u: -self.u,
            v: -self.v,
            w: -self.w,
        }
    }
}
