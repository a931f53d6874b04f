// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generate visibilities of a sky model over an array's (u,v,w) coverage.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use super::sampling_progress_bar;
use crate::{
    io::write::{write_visibilities_json, ImageWriteError},
    sampling::{sample_visibilities_with_progress, SamplingError, UvCoverage},
    sky::SkyImage,
};

/// Parameters needed to do visibility simulation.
pub(crate) struct VisSimulateParams {
    /// The rendered sky model.
    pub(crate) sky: SkyImage,

    pub(crate) coverage: UvCoverage,

    /// The output json file.
    pub(crate) output: PathBuf,
}

impl VisSimulateParams {
    pub(crate) fn run(&self) -> Result<(), VisSimulateError> {
        let VisSimulateParams {
            sky,
            coverage,
            output,
        } = self;

        let progress = sampling_progress_bar(coverage.len());
        let vis = sample_visibilities_with_progress(sky, coverage, progress)?;
        info!(
            "Simulated {} visibilities over {} timestep(s)",
            vis.len(),
            coverage.num_timesteps()
        );

        write_visibilities_json(output, &vis)?;
        info!("Visibilities written to {}", output.display());
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(crate) enum VisSimulateError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Write(#[from] ImageWriteError),
}
