// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation times and the rotation of the Earth.

use hifitime::{Duration, Epoch};
use thiserror::Error;

use crate::constants::{SOLAR_TO_SIDEREAL, TAU};

const SECONDS_PER_DAY: f64 = 86400.0;

lazy_static::lazy_static! {
    static ref HOUR_ANGLE_REGEX: regex::Regex = regex::Regex::new(
        r"^\s*(?P<hours>\d+)\s*[hH]\s*(?:(?P<minutes>\d+)\s*[mM])?\s*(?:(?P<seconds>\d+(?:\.\d*)?)\s*[sS])?\s*$"
    )
    .expect("hour-angle regex is valid");
}

/// The J2000 reference epoch (2000-01-01 12:00:00 UTC).
pub fn j2000() -> Epoch {
    Epoch::from_gregorian_utc_at_noon(2000, 1, 1)
}

/// Get an [`Epoch`] from a number of days since the J2000 epoch and an hour of
/// that day.
pub fn epoch_from_day_and_hour(day: i64, hour: f64) -> Epoch {
    j2000() + Duration::from_seconds(day as f64 * SECONDS_PER_DAY + hour * 3600.0)
}

/// The (fractional) number of days since the J2000 epoch.
pub fn days_since_j2000(epoch: Epoch) -> f64 {
    (epoch - j2000()).to_seconds() / SECONDS_PER_DAY
}

/// The rotation angle of the Earth relative to the fixed star background since
/// the J2000 epoch \[radians, 0 to 2π\].
pub fn earth_rotation_angle(epoch: Epoch) -> f64 {
    (days_since_j2000(epoch) * SOLAR_TO_SIDEREAL).rem_euclid(1.0) * TAU
}

/// The local sidereal angle of an array at the given longitude \[radians, 0 to
/// 2π\]. Hour angles of targets are taken relative to this.
pub fn local_sidereal_angle(epoch: Epoch, longitude_rad: f64) -> f64 {
    (earth_rotation_angle(epoch) + longitude_rad).rem_euclid(TAU)
}

#[derive(Error, Debug, PartialEq)]
pub enum HourAngleParseError {
    #[error("Couldn't parse '{0}' as an hour angle; expected something like '12h30m00s'")]
    Malformed(String),

    #[error("Hour angle '{0}' has minutes or seconds of 60 or more")]
    OutOfRange(String),
}

/// Parse a string like "12h30m15s" into an angle \[radians\]. The minutes and
/// seconds are optional.
pub fn parse_hour_angle(s: &str) -> Result<f64, HourAngleParseError> {
    let caps = HOUR_ANGLE_REGEX
        .captures(s)
        .ok_or_else(|| HourAngleParseError::Malformed(s.to_string()))?;
    let get = |name: &str| -> Result<f64, HourAngleParseError> {
        match caps.name(name) {
            Some(m) => m
                .as_str()
                .parse::<f64>()
                .map_err(|_| HourAngleParseError::Malformed(s.to_string())),
            None => Ok(0.0),
        }
    };
    let hours = get("hours")?;
    let minutes = get("minutes")?;
    let seconds = get("seconds")?;
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(HourAngleParseError::OutOfRange(s.to_string()));
    }

    Ok(TAU * (hours + (minutes + seconds / 60.0) / 60.0) / 24.0)
}

/// Format an angle \[radians\] as an hour angle like "12h30m15s". The angle is
/// wrapped into a single day and rounded to the nearest second.
pub fn format_hour_angle(angle_rad: f64) -> String {
    let frac = (angle_rad / TAU).rem_euclid(1.0);
    let total_seconds = (frac * SECONDS_PER_DAY).round() as u64 % SECONDS_PER_DAY as u64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{h}h{m}m{s}s")
}
