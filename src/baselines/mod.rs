// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Baselines: the vector separations between pairs of antennas.
//!
//! Baselines are derived on demand from antenna positions and never stored.
//! For antennas `i < j`, the baseline vector is `pos[j] - pos[i]`; the same
//! baseline viewed from the other antenna is its negation.


use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    array::{AntennaArray, AntennaFlags},
    coord::{HADec, ENH, UVW},
};

/// The number of cross-correlation baselines formed by `num_antennas`.
pub fn num_cross_baselines(num_antennas: usize) -> usize {
    num_antennas * num_antennas.saturating_sub(1) / 2
}

/// The separation between two antennas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    /// The index of the first antenna.
    pub ant1: usize,
    /// The index of the second antenna.
    pub ant2: usize,
    /// `position[ant2] - position[ant1]` \[metres\]
    pub enh: ENH,
}

impl Baseline {
    pub fn ant_pair(&self) -> (usize, usize) {
        (self.ant1, self.ant2)
    }

    /// Does this baseline involve the given antenna?
    pub fn involves(&self, antenna: usize) -> bool {
        self.ant1 == antenna || self.ant2 == antenna
    }

    /// The length of the baseline \[metres\].
    pub fn length(&self) -> f64 {
        let ENH { e, n, h } = self.enh;
        (e * e + n * n + h * h).sqrt()
    }

    /// Project this baseline onto the (u,v,w) plane of a phase centre \[metres\].
    pub fn to_uvw(&self, array_latitude_rad: f64, phase_centre: HADec) -> UVW {
        UVW::from_xyz(self.enh.to_xyz(array_latitude_rad).into_baseline(), phase_centre)
    }
}

impl std::ops::Neg for Baseline {
    type Output = Baseline;

    /// The same baseline, measured from the second antenna.
    fn neg(self) -> Baseline {
        Baseline {
            ant1: self.ant2,
            ant2: self.ant1,
            enh: -self.enh,
        }
    }
}

/// Form the baselines between every pair of unflagged antennas. Fewer than two
/// unflagged antennas gives no baselines.
pub fn generate_baselines(array: &AntennaArray, flags: &AntennaFlags) -> Vec<Baseline> {
    let antennas = array.antennas();
    let unflagged: Vec<usize> = flags.unflagged_indices().collect();
    let mut baselines = Vec::with_capacity(num_cross_baselines(unflagged.len()));
    for (pos, &i) in unflagged.iter().enumerate() {
        for &j in &unflagged[pos + 1..] {
            baselines.push(Baseline {
                ant1: i,
                ant2: j,
                enh: antennas[j].position - antennas[i].position,
            });
        }
    }
    baselines
}

/// Form the baselines between every pair of the supplied positions; no
/// antenna is flagged.
pub fn baselines_from_positions(positions: &[ENH]) -> Vec<Baseline> {
    let mut baselines = Vec::with_capacity(num_cross_baselines(positions.len()));
    for (i, &p1) in positions.iter().enumerate() {
        for (j, &p2) in positions.iter().enumerate().skip(i + 1) {
            baselines.push(Baseline {
                ant1: i,
                ant2: j,
                enh: p2 - p1,
            });
        }
    }
    baselines
}

/// The longest baseline \[metres\]. Zero if there are no baselines.
pub fn max_baseline_length(baselines: &[Baseline]) -> f64 {
    baselines
        .iter()
        .map(|bl| bl.length())
        .fold(0.0, f64::max)
}

/// Project all baselines onto the (u,v,w) plane of a phase centre \[metres\].
/// Processing is done in parallel.
pub fn baselines_to_uvws(
    baselines: &[Baseline],
    array_latitude_rad: f64,
    phase_centre: HADec,
) -> Vec<UVW> {
    let (s_ha, c_ha) = phase_centre.ha.sin_cos();
    let (s_dec, c_dec) = phase_centre.dec.sin_cos();
    baselines
        .par_iter()
        .map(|bl| {
            let xyz = bl.enh.to_xyz(array_latitude_rad).into_baseline();
            UVW::from_xyz_inner(xyz, s_ha, c_ha, s_dec, c_dec)
        })
        .collect()
}

/// Maps between antenna pairs and baseline indices.
pub struct AntennaBaselineMaps {
    pub antenna_to_baseline_map: HashMap<(usize, usize), usize>,
    pub baseline_to_antenna_map: HashMap<usize, (usize, usize)>,
}

impl AntennaBaselineMaps {
    pub fn new(flags: &AntennaFlags) -> AntennaBaselineMaps {
        let mut antenna_to_baseline_map = HashMap::new();
        let mut baseline_to_antenna_map = HashMap::new();
        let unflagged: Vec<usize> = flags.unflagged_indices().collect();
        let mut bl = 0;
        for (pos, &ant1) in unflagged.iter().enumerate() {
            for &ant2 in &unflagged[pos + 1..] {
                antenna_to_baseline_map.insert((ant1, ant2), bl);
                baseline_to_antenna_map.insert(bl, (ant1, ant2));
                bl += 1;
            }
        }

        AntennaBaselineMaps {
            antenna_to_baseline_map,
            baseline_to_antenna_map,
        }
    }

    /// Get the baseline index of an antenna pair, in either order.
    pub fn get_baseline(&self, ant1: usize, ant2: usize) -> Option<usize> {
        let key = if ant1 < ant2 {
            (ant1, ant2)
        } else {
            (ant2, ant1)
        };
        self.antenna_to_baseline_map.get(&key).copied()
    }
}
