//! Core domain types for the marathon trainer.
//!
//! This module defines the data shapes shared by every component:
//! - Calendar dates (`IsoDate`)
//! - Plan settings and partial updates to them
//! - The generated plan (weeks and days)
//! - Logged training sessions and the persisted application state
//!
//! Everything that crosses the persistence boundary serializes with the
//! camelCase field names of the stored record.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Dates
// ============================================================================

/// A calendar day, always rendered as `yyyy-MM-dd`
///
/// Dates carry no time or timezone: a day is a day in the user's local
/// calendar. Ordering is chronological, which for this format is also the
/// lexical ordering of the string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate(NaiveDate);

impl IsoDate {
    /// Build a date from its components, `None` if the day does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a strict `yyyy-MM-dd` string
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !well_formed {
            return Err(Error::InvalidDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }

    /// The underlying calendar date
    pub fn naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for IsoDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for IsoDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for IsoDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// Kind of session scheduled on a plan day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Rest,
    Easy,
    Tempo,
    Long,
}

impl WorkoutType {
    /// Wire name (`rest`, `easy`, `tempo`, `long`)
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Rest => "rest",
            WorkoutType::Easy => "easy",
            WorkoutType::Tempo => "tempo",
            WorkoutType::Long => "long",
        }
    }

    pub fn is_rest(self) -> bool {
        self == WorkoutType::Rest
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Inputs to plan generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Week-1 anchor; any weekday, not normalized to Monday
    pub plan_start_date: IsoDate,
    /// Current sustainable weekly volume
    pub base_weekly_km: f64,
    /// Easy pace in minutes per km (6.5 => 6:30/km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy_pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_pace_min_per_km: Option<f64>,
    /// Safety ceiling for weekly volume, expected to be >= base
    pub peak_weekly_cap_km: f64,
}

impl Settings {
    pub const DEFAULT_BASE_WEEKLY_KM: f64 = 10.0;
    pub const DEFAULT_PEAK_WEEKLY_CAP_KM: f64 = 55.0;

    /// Default settings for a plan starting on `today`
    pub fn defaults(today: IsoDate) -> Self {
        Self {
            plan_start_date: today,
            base_weekly_km: Self::DEFAULT_BASE_WEEKLY_KM,
            easy_pace_min_per_km: None,
            tempo_pace_min_per_km: None,
            peak_weekly_cap_km: Self::DEFAULT_PEAK_WEEKLY_CAP_KM,
        }
    }

    /// Apply a partial update; fields absent from the patch are kept
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(date) = patch.plan_start_date {
            self.plan_start_date = date;
        }
        if let Some(km) = patch.base_weekly_km {
            self.base_weekly_km = km;
        }
        if let Some(pace) = patch.easy_pace_min_per_km {
            self.easy_pace_min_per_km = pace;
        }
        if let Some(pace) = patch.tempo_pace_min_per_km {
            self.tempo_pace_min_per_km = pace;
        }
        if let Some(km) = patch.peak_weekly_cap_km {
            self.peak_weekly_cap_km = km;
        }
    }
}

/// Partial settings update
///
/// The optional paces use a nested `Option`: `Some(None)` clears the pace,
/// `None` leaves it untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub plan_start_date: Option<IsoDate>,
    pub base_weekly_km: Option<f64>,
    pub easy_pace_min_per_km: Option<Option<f64>>,
    pub tempo_pace_min_per_km: Option<Option<f64>>,
    pub peak_weekly_cap_km: Option<f64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Plan
// ============================================================================

/// One scheduled day of the plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub date: IsoDate,
    /// Position within the week, 0 = Monday slot .. 6 = Sunday slot
    pub day_index: u8,
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    pub planned_km: f64,
    pub pace_hint: String,
}

/// One week of the plan, always seven days in template order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanWeek {
    pub week_number: u32,
    pub start_date: IsoDate,
    pub end_date: IsoDate,
    /// Rounded sum of the seven days' planned distance
    pub target_weekly_km: f64,
    pub days: Vec<PlanDay>,
}

impl PlanWeek {
    /// The week's long-run day, if it has one
    pub fn long_run_day(&self) -> Option<&PlanDay> {
        self.days.iter().find(|d| d.kind == WorkoutType::Long)
    }

    pub fn contains(&self, date: IsoDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// The full ordered training calendar
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Plan {
    pub weeks: Vec<PlanWeek>,
}

impl Plan {
    /// Look up a week by its 1-based number
    pub fn week(&self, week_number: u32) -> Option<&PlanWeek> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Every day of the plan in calendar order
    pub fn days(&self) -> impl Iterator<Item = &PlanDay> + '_ {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

// ============================================================================
// Logs and persisted state
// ============================================================================

/// A session the user actually ran
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLogEntry {
    pub date: IsoDate,
    pub distance_km: f64,
    #[serde(deserialize_with = "deserialize_whole_seconds")]
    pub time_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Read a stored duration that may carry fractional seconds
///
/// Values are rounded to whole seconds and saturate at the `u32` bounds, so
/// an odd duration never invalidates the rest of the record.
fn deserialize_whole_seconds<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u32, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    if !seconds.is_finite() {
        return Err(de::Error::custom(format!("invalid duration {}", seconds)));
    }
    Ok(seconds.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Logged sessions keyed by date; at most one entry per day
pub type LogsByDate = BTreeMap<IsoDate, TrainingLogEntry>;

/// Everything persisted for one user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub version: u32,
    pub settings: Settings,
    pub logs_by_date: LogsByDate,
}

impl AppState {
    /// The only record version this crate reads or writes
    pub const CURRENT_VERSION: u32 = 1;

    /// Fresh state with no logs
    pub fn new(settings: Settings) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            settings,
            logs_by_date: LogsByDate::new(),
        }
    }
}
