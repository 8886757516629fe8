//! Validating user input: training log entries and settings changes.
//!
//! Parsing fails closed: anything unparseable, non-finite, negative or zero
//! is rejected with `Error::InvalidInput` and nothing is saved.

use crate::calendar::round1;
use crate::{Error, IsoDate, Result, SettingsPatch, TrainingLogEntry};

/// Parse a distance in km; must be a finite number greater than zero
pub fn parse_distance_km(text: &str) -> Result<f64> {
    let km: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("distance '{}' is not a number", text)))?;

    if !km.is_finite() || km <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "distance must be greater than zero, got '{}'",
            text
        )));
    }

    Ok(km)
}

/// Parse one time component; empty means zero
fn parse_time_component(text: &str, unit: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(Error::InvalidInput(format!(
            "{} '{}' is not a non-negative number",
            unit, text
        ))),
    }
}

/// Combine hour/minute/second fields into whole seconds
///
/// Empty fields count as zero. A total of zero is allowed here; entry
/// construction rejects it.
pub fn parse_time_to_seconds(hours: &str, minutes: &str, seconds: &str) -> Result<u32> {
    let h = parse_time_component(hours, "hours")?;
    let m = parse_time_component(minutes, "minutes")?;
    let s = parse_time_component(seconds, "seconds")?;

    let total = (h * 3600.0 + m * 60.0 + s).round();
    if total > f64::from(u32::MAX) {
        return Err(Error::InvalidInput("duration is too long".into()));
    }

    Ok(total as u32)
}

/// Parse `h:m:s`, `m:s` or plain seconds
pub fn parse_duration(text: &str) -> Result<u32> {
    let parts: Vec<&str> = text.trim().split(':').collect();

    match parts.as_slice() {
        [s] => parse_time_to_seconds("", "", s),
        [m, s] => parse_time_to_seconds("", m, s),
        [h, m, s] => parse_time_to_seconds(h, m, s),
        _ => Err(Error::InvalidInput(format!(
            "duration '{}' must be h:m:s, m:s or seconds",
            text
        ))),
    }
}

impl TrainingLogEntry {
    /// Validate and normalize a logged session
    ///
    /// The distance is rounded to one decimal and the note is trimmed, with
    /// an empty note stored as absent.
    pub fn new(
        date: IsoDate,
        distance_km: f64,
        time_seconds: u32,
        note: Option<&str>,
    ) -> Result<Self> {
        let rounded_km = round1(distance_km);
        if !rounded_km.is_finite() || rounded_km <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "distance must be at least 0.1 km, got {}",
                distance_km
            )));
        }
        if time_seconds == 0 {
            return Err(Error::InvalidInput(
                "time must be greater than zero".into(),
            ));
        }

        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            date,
            distance_km: rounded_km,
            time_seconds,
            note,
        })
    }

    /// Parse raw form fields into an entry
    pub fn from_input(
        date: &str,
        distance: &str,
        duration: &str,
        note: Option<&str>,
    ) -> Result<Self> {
        let date = IsoDate::parse(date.trim())?;
        let distance_km = parse_distance_km(distance)?;
        let time_seconds = parse_duration(duration)?;
        Self::new(date, distance_km, time_seconds, note)
    }
}

impl SettingsPatch {
    /// Reject distances and paces a plan cannot be built from
    ///
    /// Distances must be finite and non-negative, paces finite and positive.
    /// Whether the cap is at least the base stays the caller's concern.
    pub fn validate(&self) -> Result<()> {
        for (name, km) in [
            ("base weekly km", self.base_weekly_km),
            ("peak weekly cap", self.peak_weekly_cap_km),
        ] {
            if let Some(km) = km {
                if !km.is_finite() || km < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "{} must be a non-negative number, got {}",
                        name, km
                    )));
                }
            }
        }

        for (name, pace) in [
            ("easy pace", self.easy_pace_min_per_km),
            ("tempo pace", self.tempo_pace_min_per_km),
        ] {
            if let Some(Some(pace)) = pace {
                if !pace.is_finite() || pace <= 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "{} must be a positive number of minutes per km, got {}",
                        name, pace
                    )));
                }
            }
        }

        Ok(())
    }
}
