// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle East, North and Height coordinates (the ground-plane frame antennas
//! are placed in).

use serde::{Deserialize, Serialize};

use super::XyzGeodetic;

/// East, North and Height coordinates of an antenna. All units are in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub struct ENH {
    /// East \[metres\]
    pub e: f64,
    /// North \[metres\]
    pub n: f64,
    /// Height \[metres\]
    pub h: f64,
}

impl ENH {
    pub fn new(e: f64, n: f64, h: f64) -> ENH {
        ENH { e, n, h }
    }

    /// Convert coords in local topocentric East, North, Height units to 'local'
    /// XYZ units. Local means Z points north, X points through the equator from
    /// the geocenter along the local meridian and Y is East. This is like the
    /// absolute system except that zero longitude is now the local meridian
    /// rather than prime meridian. Latitude is geodetic, in radians.
    pub fn to_xyz(self, latitude_rad: f64) -> XyzGeodetic {
        let (s_lat, c_lat) = latitude_rad.sin_cos();
        XyzGeodetic {
            x: -self.n * s_lat + self.h * c_lat,
            y: self.e,
            z: self.n * c_lat + self.h * s_lat,
        }
    }

    /// Are all of the components finite?
    pub fn is_finite(&self) -> bool {
        self.e.is_finite() && self.n.is_finite() && self.h.is_finite()
    }

    /// The length of the horizontal (East, North) part of this vector
    /// \[metres\].
    pub fn horizontal_length(&self) -> f64 {
        self.e.hypot(self.n)
    }
}

impl std::ops::Sub for ENH {
    type Output = ENH;

    fn sub(self, rhs: ENH) -> ENH {
        ENH {
            e: self.e - rhs.e,
            n: self.n - rhs.n,
            h: self.h - rhs.h,
        }
    }
}

impl std::ops::Neg for ENH {
    type Output = ENH;

    fn neg(self) -> ENH {
        ENH {
            e: -self.e,
            n: -self.n,
            h: -self.h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn convert_enh_to_xyz_test() {
        let enh = ENH {
            n: -101.530,
            e: -585.675,
            h: 375.212,
        };
        let xyz = enh.to_xyz((-26.703319_f64).to_radians());
        assert_abs_diff_eq!(xyz.x, 289.5692867016053, epsilon = 1e-10);
        assert_abs_diff_eq!(xyz.y, -585.675, epsilon = 1e-10);
        assert_abs_diff_eq!(xyz.z, -259.3106516191025, epsilon = 1e-10);
    }

    #[test]
    fn enh_to_xyz_and_back() {
        let enh = ENH::new(12.5, -3.0, 0.75);
        let latitude = 0.3;
        let back = enh.to_xyz(latitude).to_enh(latitude);
        assert_abs_diff_eq!(back.e, enh.e, epsilon = 1e-12);
        assert_abs_diff_eq!(back.n, enh.n, epsilon = 1e-12);
        assert_abs_diff_eq!(back.h, enh.h, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_enh() {
        assert!(ENH::new(1.0, 2.0, 3.0).is_finite());
        assert!(!ENH::new(f64::NAN, 2.0, 3.0).is_finite());
        assert!(!ENH::new(1.0, f64::INFINITY, 3.0).is_finite());
    }
}
