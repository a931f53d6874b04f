// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (hour angle, declination) coordinates.

use super::{AzEl, RADec};

/// A struct containing an Hour Angle and Declination. All units are in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HADec {
    /// Hour angle \[radians\]
    pub ha: f64,
    /// Declination \[radians\]
    pub dec: f64,
}

impl HADec {
    /// Make a new `HADec` struct from values in radians.
    pub fn new(ha: f64, dec: f64) -> HADec {
        HADec { ha, dec }
    }

    /// Make a new `HADec` struct from values in degrees.
    pub fn from_degrees(ha: f64, dec: f64) -> HADec {
        HADec::new(ha.to_radians(), dec.to_radians())
    }

    /// The direction straight up from an array at the given latitude.
    pub fn zenith(latitude_rad: f64) -> HADec {
        HADec::new(0.0, latitude_rad)
    }

    /// Given a local sidereal time, make a new `RADec` struct from a `HADec`.
    pub fn to_radec(self, lst_rad: f64) -> RADec {
        RADec {
            ra: lst_rad - self.ha,
            dec: self.dec,
        }
    }

    /// Convert the equatorial coordinates to horizon coordinates (azimuth and
    /// elevation), given the local latitude on Earth. Azimuth is measured from
    /// North through East.
    pub fn to_azel(self, latitude_rad: f64) -> AzEl {
        let (s_ha, c_ha) = self.ha.sin_cos();
        let (s_dec, c_dec) = self.dec.sin_cos();
        let (s_lat, c_lat) = latitude_rad.sin_cos();

        let x = -c_ha * c_dec * s_lat + s_dec * c_lat;
        let y = -s_ha * c_dec;
        let z = c_ha * c_dec * c_lat + s_dec * s_lat;

        let r = x.hypot(y);
        let az = if r == 0.0 { 0.0 } else { y.atan2(x) };
        let az = if az < 0.0 { az + crate::constants::TAU } else { az };
        let el = z.atan2(r);
        AzEl::new(az, el)
    }
}

impl std::fmt::Display for HADec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}°, {}°)", self.ha.to_degrees(), self.dec.to_degrees())
    }
}
