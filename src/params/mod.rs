// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters that are kept modular to be used in multiple aspects of
//! `observatory`.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly.

mod baselines;
mod image;
mod vis_simulate;

pub(crate) use baselines::BaselinesParams;
pub(crate) use image::{ImageError, ImageParams};
pub(crate) use vis_simulate::{VisSimulateError, VisSimulateParams};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::{
    array::{AntennaArray, AntennaFlags},
    PROGRESS_BARS,
};

/// An antenna array and where it is on the Earth.
pub(crate) struct ArrayParams {
    pub(crate) array: AntennaArray,
    pub(crate) flags: AntennaFlags,

    /// \[radians\]
    pub(crate) latitude_rad: f64,

    /// \[radians\]
    pub(crate) longitude_rad: f64,
}

/// A progress bar for visibility sampling, hidden if the user doesn't want
/// progress bars.
fn sampling_progress_bar(num_samples: usize) -> ProgressBar {
    ProgressBar::with_draw_target(
        Some(num_samples as u64),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} samples ({elapsed_precise}<{eta_precise})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Sampling")
}
