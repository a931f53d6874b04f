// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Every `observatory`
//! subcommand needs an antenna layout, and both `vis-simulate` and `image`
//! need an observation and a sky model, so those arguments are shared here.

mod printers;

pub(crate) use printers::{display_warnings, InfoPrinter, Warn};

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use hifitime::Duration;
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::ObservatoryError;
use crate::{
    array::AntennaArray,
    baselines::{generate_baselines, max_baseline_length},
    constants::{
        DEFAULT_ARRAY_LATITUDE_DEG, DEFAULT_ARRAY_LONGITUDE_DEG, DEFAULT_DAY, DEFAULT_FREQ_HZ,
        DEFAULT_HOUR, DEFAULT_IMAGE_SIZE, DEFAULT_NUM_TIMESTEPS, DEFAULT_TIME_RES_SECONDS, TAU,
    },
    coord::RADec,
    imaging::auto_cell_size,
    params::ArrayParams,
    sampling::{make_timestamps, ObservationParams, UvCoverage},
    sky::{SkyImage, SkyModel},
    time::{
        epoch_from_day_and_hour, format_hour_angle, local_sidereal_angle, parse_hour_angle,
        HourAngleParseError,
    },
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref LATITUDE_HELP: String =
        format!("The latitude of the array [degrees]. Default: {DEFAULT_ARRAY_LATITUDE_DEG}");

    static ref LONGITUDE_HELP: String =
        format!("The longitude of the array [degrees]. Default: {DEFAULT_ARRAY_LONGITUDE_DEG}");

    static ref FREQ_HELP: String =
        format!("The observing frequency [MHz]. Default: {}", DEFAULT_FREQ_HZ / 1e6);

    static ref DAY_HELP: String =
        format!("The day of the observation, counted from the J2000 epoch. Default: {DEFAULT_DAY}");

    static ref HOUR_HELP: String =
        format!("The hour of the day the observation starts, either as a number or like 12h30m00s. Default: {DEFAULT_HOUR}");

    static ref NUM_TIMESTEPS_HELP: String =
        format!("The number of timesteps to sample. More than one timestep only makes sense with a phase centre. Default: {DEFAULT_NUM_TIMESTEPS}");

    static ref TIME_RES_HELP: String =
        format!("The time between timesteps [seconds]. Default: {DEFAULT_TIME_RES_SECONDS}");

    static ref IMAGE_SIZE_HELP: String =
        format!("The number of pixels along each side of all images. Default: {DEFAULT_IMAGE_SIZE}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(ObservatoryError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(ObservatoryError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(ObservatoryError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ArrayArgs {
    /// Path to the antenna layout file (toml or json). Each antenna needs an
    /// "east" and "north" position [metres]; "name", "height" and
    /// "dish_diameter" are optional.
    #[clap(short, long, parse(from_os_str), help_heading = "ARRAY")]
    pub(super) layout: Option<PathBuf>,

    #[clap(long, help = LATITUDE_HELP.as_str(), help_heading = "ARRAY", allow_hyphen_values = true)]
    pub(super) latitude: Option<f64>,

    #[clap(long, help = LONGITUDE_HELP.as_str(), help_heading = "ARRAY", allow_hyphen_values = true)]
    pub(super) longitude: Option<f64>,
}

impl ArrayArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            layout: self.layout.or(other.layout),
            latitude: self.latitude.or(other.latitude),
            longitude: self.longitude.or(other.longitude),
        }
    }

    /// Read the antenna layout, flag unusable antennas and queue warnings
    /// about anything suspicious in it.
    pub(super) fn parse(self) -> Result<ArrayParams, ObservatoryError> {
        let ArrayArgs {
            layout,
            latitude,
            longitude,
        } = self;

        let layout = layout.ok_or(CommonArgsError::NoLayout)?;
        let latitude_deg = latitude.unwrap_or(DEFAULT_ARRAY_LATITUDE_DEG);
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(CommonArgsError::LatitudeInvalid(latitude_deg).into());
        }
        let longitude_deg = longitude.unwrap_or(DEFAULT_ARRAY_LONGITUDE_DEG);
        if !(-180.0..=360.0).contains(&longitude_deg) {
            return Err(CommonArgsError::LongitudeInvalid(longitude_deg).into());
        }

        let array = AntennaArray::from_file(&layout)?;
        let flags = array.flags();
        for warning in array.warnings() {
            warning.to_string().warn();
        }

        let mut printer = InfoPrinter::new("Antenna array".into());
        printer.push_line(format!("from {}", layout.display()).into());
        let mut block = vec![format!("{} antennas", array.len()).into()];
        let flagged = flags.flagged_indices();
        if !flagged.is_empty() {
            block.push(format!("Flagged: {flagged:?}").into());
        }
        printer.push_block(block);
        printer.push_line(
            format!("Array position: {latitude_deg:>8.4}° lat, {longitude_deg:>8.4}° long").into(),
        );
        printer.display();

        Ok(ArrayParams {
            array,
            flags,
            latitude_rad: latitude_deg.to_radians(),
            longitude_rad: longitude_deg.to_radians(),
        })
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ObservationArgs {
    #[clap(short, long, help = FREQ_HELP.as_str(), help_heading = "OBSERVATION")]
    pub(super) freq: Option<f64>,

    /// The phase centre right ascension [degrees]. If neither this nor the
    /// declination is given, the array points at the zenith and the coverage
    /// is a static snapshot.
    #[clap(short, long, help_heading = "OBSERVATION")]
    pub(super) ra: Option<f64>,

    /// The phase centre declination [degrees].
    #[clap(short, long, help_heading = "OBSERVATION", allow_hyphen_values = true)]
    pub(super) dec: Option<f64>,

    #[clap(long, help = DAY_HELP.as_str(), help_heading = "OBSERVATION", allow_hyphen_values = true)]
    pub(super) day: Option<i64>,

    #[clap(long, help = HOUR_HELP.as_str(), help_heading = "OBSERVATION")]
    pub(super) hour: Option<String>,

    #[clap(short = 't', long, help = NUM_TIMESTEPS_HELP.as_str(), help_heading = "OBSERVATION")]
    pub(super) num_timesteps: Option<usize>,

    #[clap(long, help = TIME_RES_HELP.as_str(), help_heading = "OBSERVATION")]
    pub(super) time_res: Option<f64>,

    /// Don't sample the (0,0) spacing. Without it, the total flux of the sky
    /// isn't measured.
    #[clap(long, help_heading = "OBSERVATION")]
    #[serde(default)]
    pub(super) no_zero_spacing: bool,
}

/// Parse an hour of the day, given either as a number or as an hour-angle
/// string.
pub(super) fn parse_hour(s: &str) -> Result<f64, CommonArgsError> {
    let hour = match s.trim().parse::<f64>() {
        Ok(h) => h,
        Err(_) => parse_hour_angle(s)? / TAU * 24.0,
    };
    if !(0.0..24.0).contains(&hour) {
        return Err(CommonArgsError::HourInvalid(s.to_string()));
    }
    Ok(hour)
}

impl ObservationArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            freq: self.freq.or(other.freq),
            ra: self.ra.or(other.ra),
            dec: self.dec.or(other.dec),
            day: self.day.or(other.day),
            hour: self.hour.or(other.hour),
            num_timesteps: self.num_timesteps.or(other.num_timesteps),
            time_res: self.time_res.or(other.time_res),
            no_zero_spacing: self.no_zero_spacing || other.no_zero_spacing,
        }
    }

    pub(super) fn parse(self, array: &ArrayParams) -> Result<ObservationParams, ObservatoryError> {
        let ObservationArgs {
            freq,
            ra,
            dec,
            day,
            hour,
            num_timesteps,
            time_res,
            no_zero_spacing,
        } = self;

        let freq_hz = freq.map(|f| f * 1e6).unwrap_or(DEFAULT_FREQ_HZ);
        let phase_centre = match (ra, dec) {
            (Some(ra), Some(dec)) => {
                if !(0.0..=360.0).contains(&ra) {
                    return Err(CommonArgsError::RaInvalid.into());
                }
                if !(-90.0..=90.0).contains(&dec) {
                    return Err(CommonArgsError::DecInvalid.into());
                }
                Some(RADec::from_degrees(ra, dec))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(CommonArgsError::OnlyOneRAOrDec.into())
            }
            (None, None) => None,
        };

        let day = day.unwrap_or(DEFAULT_DAY);
        let hour = match hour {
            Some(h) => parse_hour(&h)?,
            None => DEFAULT_HOUR,
        };
        let start = epoch_from_day_and_hour(day, hour);
        let num_timesteps = NonZeroUsize::new(num_timesteps.unwrap_or(DEFAULT_NUM_TIMESTEPS))
            .ok_or(CommonArgsError::ZeroTimesteps)?;
        let time_res = Duration::from_seconds(time_res.unwrap_or(DEFAULT_TIME_RES_SECONDS));
        let timestamps = make_timestamps(start, time_res, num_timesteps)?;
        trace!("Timestamps: {timestamps:?}");

        let mut obs = ObservationParams::new(
            array.latitude_rad,
            array.longitude_rad,
            phase_centre,
            timestamps,
            freq_hz,
        )?;
        obs.include_zero_spacing = !no_zero_spacing;
        if no_zero_spacing {
            "The (0,0) spacing won't be sampled, so images won't preserve the total flux".warn();
        }

        let mut printer = InfoPrinter::new("Observation".into());
        printer.push_block(vec![
            format!("Frequency:  {:.4} MHz", freq_hz / 1e6).into(),
            format!("Wavelength: {:.4} m", obs.wavelength()).into(),
        ]);
        printer.push_line(
            match phase_centre {
                Some(p) => format!(
                    "Phase centre: {:>8.4}° {:>8.4}°",
                    p.ra.to_degrees(),
                    p.dec.to_degrees()
                ),
                None => "Phase centre: zenith (static snapshot)".to_string(),
            }
            .into(),
        );
        let first = *obs.timestamps.first();
        printer.push_block(vec![
            format!("Start: day {day}, hour {hour:.4} ({first})").into(),
            format!(
                "LST:   {}",
                format_hour_angle(local_sidereal_angle(first, array.longitude_rad))
            )
            .into(),
            format!("{} timestep(s), {time_res} apart", obs.timestamps.len()).into(),
        ]);
        printer.display();

        Ok(obs)
    }
}

/// Form the baselines of an array and project them over an observation.
pub(super) fn make_coverage(
    array: &ArrayParams,
    obs: &ObservationParams,
) -> Result<UvCoverage, ObservatoryError> {
    let baselines = generate_baselines(&array.array, &array.flags);
    let coverage = UvCoverage::new(&baselines, obs)?;

    let mut printer = InfoPrinter::new("Coverage".into());
    printer.push_block(vec![
        format!("{} baselines", baselines.len()).into(),
        format!("Longest baseline: {:.3} m", max_baseline_length(&baselines)).into(),
    ]);
    printer.push_block(vec![
        format!(
            "{} (u,v,w) samples over {} timestep(s)",
            coverage.len(),
            coverage.num_timesteps()
        )
        .into(),
        format!(
            "Longest (u,v) distance: {:.3} wavelengths",
            coverage.max_uv_length()
        )
        .into(),
    ]);
    printer.display();

    Ok(coverage)
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SkyModelArgs {
    /// Path to a sky-model file (toml or json). Components are "point",
    /// "gaussian" or "disk" with "l" and "m" offsets from the phase centre
    /// [degrees] and a "flux" [Jy]. If not given, a 1 Jy point source at the
    /// phase centre is used.
    #[clap(short, long, parse(from_os_str), help_heading = "SKY MODEL")]
    pub(super) sky_model: Option<PathBuf>,

    #[clap(long, help = IMAGE_SIZE_HELP.as_str(), help_heading = "SKY MODEL")]
    pub(super) width: Option<usize>,

    #[clap(long, help = IMAGE_SIZE_HELP.as_str(), help_heading = "SKY MODEL")]
    pub(super) height: Option<usize>,

    /// The size of an image pixel [arcminutes]. If not given, it is chosen so
    /// the longest baseline fits on the (u,v) grid.
    #[clap(short, long, help_heading = "SKY MODEL")]
    pub(super) cell_size: Option<f64>,
}

impl SkyModelArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            sky_model: self.sky_model.or(other.sky_model),
            width: self.width.or(other.width),
            height: self.height.or(other.height),
            cell_size: self.cell_size.or(other.cell_size),
        }
    }

    /// Read the sky model and render it. `max_uv` is the longest (u,v)
    /// distance of the coverage \[wavelengths\], used when the cell size isn't
    /// given.
    pub(super) fn parse(self, max_uv: f64) -> Result<SkyImage, ObservatoryError> {
        let SkyModelArgs {
            sky_model,
            width,
            height,
            cell_size,
        } = self;

        let model = match &sky_model {
            Some(file) => SkyModel::from_file(file)?,
            None => {
                "No sky model was given; using a 1 Jy point source at the phase centre".warn();
                SkyModel::unit_point_source()
            }
        };

        let nx = width.unwrap_or(DEFAULT_IMAGE_SIZE);
        let ny = height.unwrap_or(DEFAULT_IMAGE_SIZE);
        if nx == 0 || ny == 0 {
            return Err(CommonArgsError::ZeroImageSize.into());
        }
        let cell_size = match cell_size {
            Some(arcmin) => {
                if !(arcmin.is_finite() && arcmin > 0.0) {
                    return Err(CommonArgsError::CellSizeInvalid(arcmin).into());
                }
                (arcmin / 60.0).to_radians().sin()
            }
            None => auto_cell_size(max_uv, nx, ny)?,
        };
        debug!("Image cell size: {cell_size:e} (direction cosine)");
        let sky = model.render(nx, ny, cell_size)?;

        let mut printer = InfoPrinter::new("Sky model".into());
        if let Some(file) = sky_model {
            printer.push_line(format!("from {}", file.display()).into());
        }
        printer.push_block(vec![
            format!("{} component(s)", model.components.len()).into(),
            format!("Total flux density: {:.4} Jy", model.total_flux()).into(),
        ]);
        printer.push_block(vec![
            format!("Image size: {nx}x{ny}").into(),
            format!(
                "Cell size:  {:.4}' ({:.4}° field of view)",
                cell_size.asin().to_degrees() * 60.0,
                (cell_size * nx.max(ny) as f64).min(1.0).asin().to_degrees()
            )
            .into(),
        ]);
        printer.display();

        Ok(sky)
    }
}

#[derive(Error, Debug)]
pub(super) enum CommonArgsError {
    #[error("No antenna layout file was supplied")]
    NoLayout,

    #[error("Array latitude {0} was not within -90 to 90!")]
    LatitudeInvalid(f64),

    #[error("Array longitude {0} was not within -180 to 360!")]
    LongitudeInvalid(f64),

    #[error("Right Ascension was not within 0 to 360!")]
    RaInvalid,

    #[error("Declination was not within -90 to 90!")]
    DecInvalid,

    #[error("One of RA and Dec was specified, but none or both are required!")]
    OnlyOneRAOrDec,

    #[error("Hour '{0}' is not within 0 to 24!")]
    HourInvalid(String),

    #[error(transparent)]
    HourAngle(#[from] HourAngleParseError),

    #[error("Number of timesteps cannot be 0!")]
    ZeroTimesteps,

    #[error("Image width and height cannot be 0!")]
    ZeroImageSize,

    #[error("The cell size must be positive; got {0} arcminutes")]
    CellSizeInvalid(f64),
}
