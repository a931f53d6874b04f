// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! List the baselines of an antenna array.

use std::path::PathBuf;

use log::{debug, info};

use crate::{
    array::AntennaArray,
    baselines::{max_baseline_length, Baseline},
    constants::MAX_BASELINES_TO_PRINT,
    io::write::{write_baselines_json, ImageWriteError},
};

pub(crate) struct BaselinesParams {
    pub(crate) array: AntennaArray,

    /// All baselines of unflagged antennas.
    pub(crate) baselines: Vec<Baseline>,

    /// Where to write the baselines as json, if anywhere.
    pub(crate) output: Option<PathBuf>,
}

impl BaselinesParams {
    pub(crate) fn run(&self) -> Result<(), ImageWriteError> {
        let BaselinesParams {
            array,
            baselines,
            output,
        } = self;

        let antennas = array.antennas();
        let line = |bl: &Baseline| {
            format!(
                "{:>5} {:>5}  {:>12} {:>12}  {:>10.3} {:>10.3} {:>10.3}  {:>10.3}",
                bl.ant1,
                bl.ant2,
                antennas[bl.ant1].name,
                antennas[bl.ant2].name,
                bl.enh.e,
                bl.enh.n,
                bl.enh.h,
                bl.length()
            )
        };
        let header = format!(
            "{:>5} {:>5}  {:>12} {:>12}  {:>10} {:>10} {:>10}  {:>10}",
            "ant1", "ant2", "name1", "name2", "east [m]", "north [m]", "height [m]", "length [m]"
        );

        if baselines.len() <= MAX_BASELINES_TO_PRINT {
            info!("{}", console::style(header).bold());
            for bl in baselines {
                info!("{}", line(bl));
            }
        } else {
            info!(
                "{} baselines; use -v to list them all",
                baselines.len()
            );
            debug!("{header}");
            for bl in baselines {
                debug!("{}", line(bl));
            }
        }
        info!(
            "Longest baseline: {:.3} m",
            max_baseline_length(baselines)
        );

        if let Some(output) = output {
            write_baselines_json(output, baselines, array)?;
            info!("Baselines written to {}", output.display());
        }

        Ok(())
    }
}
