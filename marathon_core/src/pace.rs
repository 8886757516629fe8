//! Pace guidance text.
//!
//! When the user has configured a pace, hints are rendered as a band around
//! it; otherwise they fall back to RPE (perceived effort) guidance.

use crate::{Settings, TrainingLogEntry, WorkoutType};

/// Half-width of the easy-run band, seconds per km
pub const EASY_BAND_SECONDS: f64 = 30.0;
pub const TEMPO_BAND_SECONDS: f64 = 20.0;
/// Long runs are anchored on the easy pace with a wider band
pub const LONG_BAND_SECONDS: f64 = 40.0;

const REST_HINT: &str = "Complete rest or light stretching";
const EASY_EFFORT_HINT: &str = "RPE 3–4 (conversational)";
const TEMPO_EFFORT_HINT: &str = "RPE 6–7 (breathing hard but sustainable)";
const LONG_EFFORT_HINT: &str = "RPE 3–4 (sustainable pace)";

/// Format seconds as `m:ss`, negatives clamp to zero
pub fn sec_to_pace(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a duration as `h:mm:ss`, or `m:ss` under an hour
pub fn seconds_to_hms(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Band of `±delta_seconds` around a pace given in minutes per km
pub fn pace_range(min_per_km: f64, delta_seconds: f64) -> String {
    let base = (min_per_km * 60.0).round();
    format!(
        "{}–{}/km",
        sec_to_pace(base - delta_seconds),
        sec_to_pace(base + delta_seconds)
    )
}

/// A pace counts as configured only when it is a positive, finite number
fn configured(pace: Option<f64>) -> Option<f64> {
    pace.filter(|p| p.is_finite() && *p > 0.0)
}

/// Guidance string for a workout of type `kind`
pub fn pace_hint(kind: WorkoutType, settings: &Settings) -> String {
    let easy = configured(settings.easy_pace_min_per_km);

    match kind {
        WorkoutType::Rest => REST_HINT.to_string(),
        WorkoutType::Easy => match easy {
            Some(pace) => format!("Easy {}", pace_range(pace, EASY_BAND_SECONDS)),
            None => EASY_EFFORT_HINT.to_string(),
        },
        WorkoutType::Tempo => match configured(settings.tempo_pace_min_per_km) {
            Some(pace) => format!("Tempo {}", pace_range(pace, TEMPO_BAND_SECONDS)),
            None => TEMPO_EFFORT_HINT.to_string(),
        },
        WorkoutType::Long => match easy {
            Some(pace) => format!("Easy {} (slower)", pace_range(pace, LONG_BAND_SECONDS)),
            None => LONG_EFFORT_HINT.to_string(),
        },
    }
}

/// Average pace of a logged session as `m:ss/km`, `-` if it cannot be computed
pub fn log_entry_pace(entry: &TrainingLogEntry) -> String {
    if entry.time_seconds == 0 || !(entry.distance_km.is_finite() && entry.distance_km > 0.0) {
        return "-".to_string();
    }
    let per_km = f64::from(entry.time_seconds) / entry.distance_km;
    format!("{}/km", sec_to_pace(per_km))
}
