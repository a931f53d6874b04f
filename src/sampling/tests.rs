// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use vec1::vec1;

use super::*;
use crate::{
    array::AntennaArray,
    baselines::{baselines_from_positions, generate_baselines},
    constants::{DEFAULT_DAY, DEFAULT_FREQ_HZ, DEFAULT_HOUR, FRAC_PI_2},
    coord::ENH,
    sky::{SkyComponent, SkyModel},
    time::epoch_from_day_and_hour,
};

const CELL: f64 = 2e-3;

fn default_epoch() -> Epoch {
    epoch_from_day_and_hour(DEFAULT_DAY, DEFAULT_HOUR)
}

fn test_sky() -> SkyImage {
    SkyModel {
        components: vec![
            SkyComponent::point(0.0, 0.0, 1.5),
            SkyComponent::point(4.0 * CELL, -2.0 * CELL, 0.75),
            SkyComponent::Gaussian {
                l: -6.0 * CELL,
                m: 5.0 * CELL,
                flux: 2.0,
                fwhm: 3.0 * CELL,
            },
        ],
    }
    .render(32, 32, CELL)
    .unwrap()
}

fn test_layout() -> Vec<ENH> {
    vec![
        ENH::new(0.0, 0.0, 0.0),
        ENH::new(31.0, 4.0, 0.2),
        ENH::new(-12.0, 47.0, -0.1),
        ENH::new(55.0, -38.0, 0.0),
        ENH::new(-61.0, -9.0, 0.4),
    ]
}

#[test]
fn zenith_snapshot_is_enh_over_wavelength() {
    let obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
    let baselines = baselines_from_positions(&test_layout());
    let coverage = UvCoverage::new(&baselines, &obs).unwrap();
    let lambda = VEL_C / DEFAULT_FREQ_HZ;

    // The zero spacing comes first.
    assert_eq!(coverage.len(), baselines.len() + 1);
    assert!(coverage.samples()[0].uvw.is_zero());
    assert_eq!(coverage.samples()[0].antennas, None);

    for (bl, s) in baselines.iter().zip(&coverage.samples()[1..]) {
        assert_eq!(s.antennas, Some(bl.ant_pair()));
        assert_abs_diff_eq!(s.uvw.u, bl.enh.e / lambda, epsilon = 1e-9);
        assert_abs_diff_eq!(s.uvw.v, bl.enh.n / lambda, epsilon = 1e-9);
        assert_abs_diff_eq!(s.uvw.w, bl.enh.h / lambda, epsilon = 1e-9);
    }
}

#[test]
fn zero_spacing_can_be_left_out() {
    let mut obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
    obs.include_zero_spacing = false;
    let baselines = baselines_from_positions(&test_layout());
    let coverage = UvCoverage::new(&baselines, &obs).unwrap();
    assert_eq!(coverage.len(), baselines.len());
    assert!(coverage.samples().iter().all(|s| !s.uvw.is_zero()));
}

#[test]
fn too_few_antennas_leave_only_the_zero_spacing() {
    let obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
    let array = AntennaArray::from_positions([ENH::new(1.0, 1.0, 0.0)]);
    let baselines = generate_baselines(&array, &array.flags());
    let coverage = UvCoverage::new(&baselines, &obs).unwrap();
    assert_eq!(coverage.len(), 1);
    assert_abs_diff_eq!(coverage.max_uv_length(), 0.0);
}

#[test]
fn bad_frequencies_are_rejected() {
    assert!(matches!(
        ObservationParams::snapshot(default_epoch(), 0.0),
        Err(CoverageError::BadFrequency(_))
    ));
    assert!(matches!(
        ObservationParams::snapshot(default_epoch(), f64::NAN),
        Err(CoverageError::BadFrequency(_))
    ));
}

#[test]
fn timestamps_are_regular() {
    let start = default_epoch();
    let timestamps = make_timestamps(
        start,
        Duration::from_seconds(600.0),
        NonZeroUsize::new(4).unwrap(),
    )
    .unwrap();
    assert_eq!(timestamps.len(), 4);
    assert_abs_diff_eq!((timestamps[3] - start).to_seconds(), 1800.0);

    let zero = Duration::from_seconds(0.0);
    assert!(make_timestamps(start, zero, NonZeroUsize::new(1).unwrap()).is_ok());
    assert!(matches!(
        make_timestamps(start, zero, NonZeroUsize::new(2).unwrap()),
        Err(CoverageError::BadTimeRes(_))
    ));
}

#[test]
fn rotation_synthesis_tracks_baselines() {
    let latitude = (-30.0_f64).to_radians();
    let start = default_epoch();
    let timestamps = make_timestamps(
        start,
        Duration::from_seconds(1800.0),
        NonZeroUsize::new(6).unwrap(),
    )
    .unwrap();
    // Put the phase centre on the meridian at the first timestep, at the
    // latitude, so it's overhead and stays well above the horizon.
    let lst = local_sidereal_angle(start, 0.0);
    let phase_centre = RADec::new(lst, latitude);
    let obs =
        ObservationParams::new(latitude, 0.0, Some(phase_centre), timestamps, DEFAULT_FREQ_HZ)
            .unwrap();
    let baselines = baselines_from_positions(&test_layout());
    let coverage = UvCoverage::new(&baselines, &obs).unwrap();
    assert_eq!(coverage.num_timesteps(), 6);
    assert_eq!(coverage.len(), 1 + 6 * baselines.len());

    // At the first timestep the phase centre is at the zenith.
    let lambda = obs.wavelength();
    let first = &coverage.samples()[1..=baselines.len()];
    for (bl, s) in baselines.iter().zip(first) {
        assert_eq!(s.timestep, 0);
        assert_abs_diff_eq!(s.uvw.u, bl.enh.e / lambda, epsilon = 1e-6);
        assert_abs_diff_eq!(s.uvw.v, bl.enh.n / lambda, epsilon = 1e-6);
    }

    // Later timesteps move the samples.
    let last = &coverage.samples()[1 + 5 * baselines.len()..];
    assert!(last.iter().all(|s| s.timestep == 5));
    for (a, b) in first.iter().zip(last) {
        assert!((a.uvw.u - b.uvw.u).abs() > 1e-3 || (a.uvw.v - b.uvw.v).abs() > 1e-3);
    }
}

#[test]
fn phase_centre_below_the_horizon() {
    let latitude = (-30.0_f64).to_radians();
    let start = default_epoch();
    // The north celestial pole is never visible from -30°.
    let obs = ObservationParams::new(
        latitude,
        0.0,
        Some(RADec::new(0.0, FRAC_PI_2)),
        vec1![start],
        DEFAULT_FREQ_HZ,
    )
    .unwrap();
    let baselines = baselines_from_positions(&test_layout());
    assert!(matches!(
        UvCoverage::new(&baselines, &obs),
        Err(CoverageError::BelowHorizon { .. })
    ));
}

#[test]
fn zero_spacing_visibility_is_total_flux() {
    let sky = test_sky();
    let flux = sky.total_flux();
    assert_abs_diff_eq!(flux, 4.25, epsilon = 1e-12);

    for layout in [test_layout(), test_layout()[..2].to_vec(), vec![]] {
        let obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
        let coverage = UvCoverage::new(&baselines_from_positions(&layout), &obs).unwrap();
        let vis = sample_visibilities(&sky, &coverage).unwrap();
        assert_eq!(vis.len(), coverage.len());
        assert_abs_diff_eq!(vis.vis[0].re, flux, epsilon = 1e-12);
        assert_abs_diff_eq!(vis.vis[0].im, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn point_source_at_phase_centre_has_flat_visibilities() {
    let sky = SkyModel::unit_point_source().render(16, 16, CELL).unwrap();
    let obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
    let coverage = UvCoverage::new(&baselines_from_positions(&test_layout()), &obs).unwrap();
    let vis = sample_visibilities(&sky, &coverage).unwrap();
    for v in &vis.vis {
        assert_abs_diff_eq!(v.re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.im, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn offset_point_source_phase() {
    // A point at l has V(u) = exp(-2πi u l).
    let l = 3.0 * CELL;
    let sky = SkyModel {
        components: vec![SkyComponent::point(l, 0.0, 2.0)],
    }
    .render(16, 16, CELL)
    .unwrap();
    let coverage = UvCoverage::full_grid(16, 16, CELL).unwrap();
    let vis = sample_visibilities(&sky, &coverage).unwrap();
    for (s, v) in vis.iter() {
        let expected = cexp(-TAU * s.uvw.u * l) * 2.0;
        assert_abs_diff_eq!(v.re, expected.re, epsilon = 1e-9);
        assert_abs_diff_eq!(v.im, expected.im, epsilon = 1e-9);
    }
}

#[test]
fn full_grid_coverage() {
    let coverage = UvCoverage::full_grid(8, 4, 0.01).unwrap();
    assert_eq!(coverage.len(), 32);
    let du = 1.0 / (8.0 * 0.01);
    let dv = 1.0 / (4.0 * 0.01);
    let first = coverage.samples()[0].uvw;
    assert_abs_diff_eq!(first.u, -4.0 * du);
    assert_abs_diff_eq!(first.v, -2.0 * dv);
    // The zero spacing is at (nx/2, ny/2).
    assert!(coverage.samples()[4 * 4 + 2].uvw.is_zero());

    assert!(matches!(
        UvCoverage::full_grid(0, 4, 0.01),
        Err(CoverageError::BadGrid { .. })
    ));
}

#[test]
fn visibilities_of_a_real_sky_are_hermitian() {
    let sky = test_sky();
    let obs = ObservationParams::snapshot(default_epoch(), DEFAULT_FREQ_HZ).unwrap();
    let baselines = baselines_from_positions(&test_layout());
    let reversed: Vec<_> = baselines.iter().map(|&b| -b).collect();
    let v1 = sample_visibilities(&sky, &UvCoverage::new(&baselines, &obs).unwrap()).unwrap();
    let v2 = sample_visibilities(&sky, &UvCoverage::new(&reversed, &obs).unwrap()).unwrap();
    for (a, b) in v1.vis.iter().zip(v2.vis.iter()).skip(1) {
        assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
        assert_abs_diff_eq!(a.im, -b.im, epsilon = 1e-9);
    }
}
