// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (right ascension, declination) coordinates.

use serde::{Deserialize, Serialize};

use super::HADec;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RADec {
    /// Right ascension \[radians\]
    pub ra: f64,
    /// Declination \[radians\]
    pub dec: f64,
}

impl RADec {
    /// Make a new `RADec` struct from values in radians.
    pub fn new(ra: f64, dec: f64) -> RADec {
        RADec { ra, dec }
    }

    /// Make a new `RADec` struct from values in degrees.
    pub fn from_degrees(ra: f64, dec: f64) -> RADec {
        RADec::new(ra.to_radians(), dec.to_radians())
    }

    /// Given a local sidereal time, make a new `HADec` struct from a `RADec`.
    pub fn to_hadec(self, lst_rad: f64) -> HADec {
        HADec {
            ha: lst_rad - self.ra,
            dec: self.dec,
        }
    }
}

impl std::fmt::Display for RADec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}°, {}°)", self.ra.to_degrees(), self.dec.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn hadec_round_trip() {
        let radec = RADec::from_degrees(62.0, -27.5);
        let lst = 1.2;
        let back = radec.to_hadec(lst).to_radec(lst);
        assert_abs_diff_eq!(back.ra, radec.ra, epsilon = 1e-12);
        assert_abs_diff_eq!(back.dec, radec.dec, epsilon = 1e-12);
    }
}
