// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (azimuth, elevation) coordinates.

use super::HADec;

/// Horizon coordinates. All units are in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AzEl {
    /// Azimuth \[radians\]
    pub az: f64,
    /// Elevation \[radians\]
    pub el: f64,
}

impl AzEl {
    /// Make a new `AzEl` struct from values in radians.
    pub fn new(az: f64, el: f64) -> AzEl {
        AzEl { az, el }
    }

    /// Make a new `AzEl` struct from values in degrees.
    pub fn from_degrees(az: f64, el: f64) -> AzEl {
        AzEl::new(az.to_radians(), el.to_radians())
    }

    /// Get the zenith angle \[radians\].
    pub fn za(&self) -> f64 {
        crate::constants::FRAC_PI_2 - self.el
    }

    /// Convert the horizon coordinates to equatorial coordinates (Hour Angle
    /// and Declination), given the local latitude on Earth.
    pub fn to_hadec(self, latitude_rad: f64) -> HADec {
        let (s_az, c_az) = self.az.sin_cos();
        let (s_el, c_el) = self.el.sin_cos();
        let (s_lat, c_lat) = latitude_rad.sin_cos();

        let x = -c_az * c_el * s_lat + s_el * c_lat;
        let y = -s_az * c_el;
        let z = c_az * c_el * c_lat + s_el * s_lat;

        let r = x.hypot(y);
        let ha = if r == 0.0 { 0.0 } else { y.atan2(x) };
        let dec = z.atan2(r);
        HADec::new(ha, dec)
    }
}

impl std::fmt::Display for AzEl {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}°, {}°)", self.az.to_degrees(), self.el.to_degrees())
    }
}
