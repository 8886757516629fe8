//! Display helpers shared by front ends.

use crate::calendar::round1;
use crate::WorkoutType;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// `12.3 km`, or `-` for zero
pub fn format_km(km: f64) -> String {
    if km == 0.0 {
        return "-".to_string();
    }
    format!("{} km", round1(km))
}

/// Template day name for a day index (0 = Mon)
pub fn day_name(day_index: u8) -> &'static str {
    DAY_NAMES.get(usize::from(day_index)).copied().unwrap_or("")
}

/// Human label for a workout type
pub fn workout_label(kind: WorkoutType) -> &'static str {
    match kind {
        WorkoutType::Rest => "Rest",
        WorkoutType::Easy => "Easy",
        WorkoutType::Tempo => "Tempo",
        WorkoutType::Long => "Long run",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(0.0), "-");
        assert_eq!(format_km(15.64), "15.6 km");
        assert_eq!(format_km(6.0), "6 km");
    }

    #[test]
    fn test_day_name() {
        assert_eq!(day_name(0), "Mon");
        assert_eq!(day_name(6), "Sun");
        assert_eq!(day_name(7), "");
    }
}
