// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Super module for all coordinate types.
//!
//! These coordinate systems are discussed at length in Interferometry and
//! Synthesis in Radio Astronomy, Third Edition, Section 4: Geometrical
//! Relationships, Polarimetry, and the Measurement Equation.

mod azel;
mod enh;
mod hadec;
mod radec;
mod uvw;
mod xyz;

pub use azel::AzEl;
pub use enh::ENH;
pub use hadec::HADec;
pub use radec::RADec;
pub use uvw::UVW;
pub use xyz::{XyzBaseline, XyzGeodetic};
