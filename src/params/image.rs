// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Simulate an observation of a sky model and reconstruct its brightness.

use std::path::PathBuf;

use log::{info, warn};
use ndarray::prelude::*;
use thiserror::Error;
use vec1::Vec1;

use super::sampling_progress_bar;
use crate::{
    cli::InfoPrinter,
    imaging::{
        fit_clean_beam, hogbom_clean, make_images, restore, CleanBeam, CleanParams, CleanResult,
        DeconvolutionError, ImagingError, Weighting,
    },
    io::write::{image_filenames, write_image, ImageOutputType, ImageWriteError},
    sampling::{sample_visibilities_with_progress, SamplingError, UvCoverage},
    sky::SkyImage,
};

pub(crate) struct ImageParams {
    /// The rendered sky model. Its geometry is also the geometry of every
    /// output image.
    pub(crate) sky: SkyImage,

    pub(crate) coverage: UvCoverage,

    pub(crate) weighting: Weighting,

    /// If this is `None`, don't deconvolve.
    pub(crate) clean: Option<CleanParams>,

    pub(crate) output_dir: PathBuf,

    pub(crate) output_types: Vec1<ImageOutputType>,
}

/// Everything that comes out of deconvolution.
pub(crate) struct CleanOutputs {
    pub(crate) result: CleanResult,
    pub(crate) beam: CleanBeam,
    pub(crate) beam_image: Array2<f64>,
    pub(crate) restored: Array2<f64>,
}

/// CLEAN the dirty image, then fit a clean beam and restore.
pub(crate) fn deconvolve(
    dirty: ArrayView2<f64>,
    psf: ArrayView2<f64>,
    params: &CleanParams,
) -> Result<CleanOutputs, DeconvolutionError> {
    let result = hogbom_clean(dirty, psf, params)?;
    let beam = fit_clean_beam(psf)?;
    let (nx, ny) = dirty.dim();
    let beam_image = beam.image(nx, ny);
    let restored = restore(result.model.view(), result.residual.view(), &beam);
    Ok(CleanOutputs {
        result,
        beam,
        beam_image,
        restored,
    })
}

impl ImageParams {
    fn write(&self, name: &str, image: ArrayView2<f64>) -> Result<(), ImageWriteError> {
        for file in image_filenames(&self.output_dir, name, &self.output_types) {
            write_image(&file, image)?;
            info!("Wrote {}", file.display());
        }
        Ok(())
    }

    pub(crate) fn run(&self) -> Result<(), ImageError> {
        let ImageParams {
            sky,
            coverage,
            weighting,
            clean,
            output_dir: _,
            output_types: _,
        } = self;
        let (nx, ny) = sky.dim();

        let progress = sampling_progress_bar(coverage.len());
        let vis = sample_visibilities_with_progress(sky, coverage, progress)?;
        let products = make_images(&vis, nx, ny, sky.cell_size(), *weighting)?;

        let num_cells = nx * ny;
        let num_sampled = products.grid.num_sampled_cells();
        let mut printer = InfoPrinter::new("Imaging".into());
        printer.push_block(vec![
            format!("Weighting: {weighting}").into(),
            format!(
                "Sampled cells: {num_sampled}/{num_cells} ({:.2}%)",
                100.0 * num_sampled as f64 / num_cells as f64
            )
            .into(),
            format!(
                "Cell widths: {:.3} x {:.3} wavelengths",
                products.grid.du, products.grid.dv
            )
            .into(),
        ]);
        printer.push_block(vec![
            format!("True flux:  {:.6} Jy", sky.total_flux()).into(),
            format!("Dirty flux: {:.6} Jy", products.dirty.sum()).into(),
            format!("PSF peak:   {:.6}", products.psf[(nx / 2, ny / 2)]).into(),
        ]);
        printer.display();
        if products.grid.num_dropped > 0 {
            warn!(
                "{} samples fell outside the (u,v) grid; use a smaller cell size to include them",
                products.grid.num_dropped
            );
        }

        self.write("sky", sky.data())?;
        self.write("sampling", products.sampling.view())?;
        self.write("psf", products.psf.view())?;
        self.write("dirty", products.dirty.view())?;

        let clean = match clean {
            Some(c) => c,
            None => return Ok(()),
        };
        match deconvolve(products.dirty.view(), products.psf.view(), clean) {
            Ok(CleanOutputs {
                result,
                beam,
                beam_image,
                restored,
            }) => {
                let mut printer = InfoPrinter::new("CLEAN".into());
                printer.push_block(vec![
                    format!(
                        "{} iterations; {}",
                        result.iterations, result.stop_reason
                    )
                    .into(),
                    format!("Threshold: {:.6} Jy/pixel", result.threshold).into(),
                ]);
                printer.push_block(vec![
                    format!("Model flux:    {:.6} Jy", result.model.sum()).into(),
                    format!(
                        "Residual peak: {:.6} Jy/pixel",
                        result.residual.fold(0.0_f64, |acc, v| acc.max(v.abs()))
                    )
                    .into(),
                ]);
                printer.push_line(
                    format!(
                        "Clean beam FWHM: {:.3} x {:.3} pixels",
                        beam.fwhm_x, beam.fwhm_y
                    )
                    .into(),
                );
                printer.display();

                self.write("clean_model", result.model.view())?;
                self.write("residual", result.residual.view())?;
                self.write("clean_beam", beam_image.view())?;
                self.write("restored", restored.view())?;
            }

            Err(e) => warn!("Deconvolution failed: {e}\nOnly the undeconvolved images were written"),
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub(crate) enum ImageError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Write(#[from] ImageWriteError),
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::imaging::{CleanThreshold, StopReason};

    #[test]
    fn deconvolve_a_point_through_a_delta_psf() {
        let n = 16;
        let mut psf = Array2::zeros((n, n));
        psf[(n / 2, n / 2)] = 1.0;
        let mut dirty = Array2::zeros((n, n));
        dirty[(3, 5)] = 2.0;

        let params = CleanParams {
            gain: 1.0,
            max_iterations: 10,
            threshold: CleanThreshold::Absolute(1e-6),
        };
        let outputs = deconvolve(dirty.view(), psf.view(), &params).unwrap();
        assert_eq!(outputs.result.stop_reason, StopReason::Threshold);
        assert_eq!(outputs.result.iterations, 1);
        assert_abs_diff_eq!(outputs.result.model[(3, 5)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(outputs.beam.fwhm_x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(outputs.beam_image.sum(), 1.0, epsilon = 1e-12);
        // Restoring preserves the flux of the components.
        assert_abs_diff_eq!(outputs.restored.sum(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn deconvolve_reports_a_flat_psf() {
        let n = 16;
        let psf = Array2::from_elem((n, n), 1.0 / (n * n) as f64);
        let mut dirty = Array2::zeros((n, n));
        dirty[(8, 8)] = 1.0;
        let result = deconvolve(dirty.view(), psf.view(), &CleanParams::default());
        assert!(result.is_err());
    }
}
