// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handle (x,y,z) coordinates of an antenna.

use super::ENH;

/// The geodetic (x,y,z) coordinates of an antenna. All units are in metres.
///
/// This coordinate system is discussed at length in Interferometry and
/// Synthesis in Radio Astronomy, Third Edition, Section 4: Geometrical
/// Relationships, Polarimetry, and the Measurement Equation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XyzGeodetic {
    /// x-coordinate \[meters\]
    pub x: f64,
    /// y-coordinate \[meters\]
    pub y: f64,
    /// z-coordinate \[meters\]
    pub z: f64,
}

impl XyzGeodetic {
    /// Convert local XYZ coordinates at a latitude to ENH coordinates.
    pub fn to_enh(self, latitude_rad: f64) -> ENH {
        let (s_lat, c_lat) = latitude_rad.sin_cos();
        ENH {
            e: self.y,
            n: -self.x * s_lat + self.z * c_lat,
            h: self.x * c_lat + self.z * s_lat,
        }
    }

    /// Treat these coordinates as a separation vector. This is appropriate
    /// when they were converted from an ENH difference.
    pub fn into_baseline(self) -> XyzBaseline {
        XyzBaseline {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl std::ops::Sub<XyzGeodetic> for XyzGeodetic {
    type Output = XyzBaseline;

    fn sub(self, rhs: Self) -> XyzBaseline {
        XyzBaseline {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// The (x,y,z) coordinates of a baseline. All units are in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct XyzBaseline {
    /// x-coordinate \[meters\]
    pub x: f64,
    /// y-coordinate \[meters\]
    pub y: f64,
    /// z-coordinate \[meters\]
    pub z: f64,
}
