//! Progression rules for weekly volume and the long run.
//!
//! The plan follows a periodized progressive-overload scheme:
//! - Weekly volume compounds by 8.5% per week from the base volume
//! - Every 4th week is a cutback week (volume x0.8, long run x0.85)
//! - Weeks 22-23 taper and week 24 is race week; those are table-driven
//!
//! Weekly volume is clamped to `[base, cap]`; the long run grows linearly
//! and is capped independently so it never outpaces total volume.

use crate::calendar::{clamp, round1};

/// Length of the plan in weeks
pub const PLAN_WEEKS: u32 = 24;

/// First taper week; weekly targets from here on come from the taper table
pub const TAPER_START_WEEK: u32 = 22;

pub const RACE_WEEK: u32 = 24;

/// Marathon distance in km
pub const MARATHON_KM: f64 = 42.195;

pub const WEEKLY_GROWTH_RATE: f64 = 1.085;

pub const CUTBACK_INTERVAL: u32 = 4;
pub const WEEKLY_CUTBACK_FACTOR: f64 = 0.8;
pub const LONG_RUN_CUTBACK_FACTOR: f64 = 0.85;

pub const LONG_RUN_START_KM: f64 = 6.0;
pub const LONG_RUN_WEEKLY_STEP_KM: f64 = 1.25;
pub const LONG_RUN_MAX_KM: f64 = 32.0;

/// Long runs for the two taper weeks
const TAPER_LONG_RUN_KM: [(u32, f64); 2] = [(22, 24.0), (23, 16.0)];

/// Whether `week` is a recovery week (4, 8, 12, ...)
pub fn is_cutback_week(week: u32) -> bool {
    week % CUTBACK_INTERVAL == 0
}

/// Whether `week` is one of the pre-race taper weeks
pub fn is_taper_week(week: u32) -> bool {
    (TAPER_START_WEEK..RACE_WEEK).contains(&week)
}

/// Target weekly distance for a growth-phase week
///
/// Returns 0 for week 22 onwards: taper and race weeks are distributed from
/// fixed values instead of this formula.
pub fn weekly_target_km(week: u32, base_weekly_km: f64, cap: f64) -> f64 {
    if week >= TAPER_START_WEEK {
        return 0.0;
    }

    let growth = WEEKLY_GROWTH_RATE.powi(week as i32 - 1);
    let mut km = base_weekly_km * growth;

    if is_cutback_week(week) {
        km *= WEEKLY_CUTBACK_FACTOR;
    }

    let km = round1(clamp(km, base_weekly_km, cap));
    tracing::trace!("Weekly target for week {}: {} km", week, km);
    km
}

/// Target long-run distance for `week`
///
/// Race week returns the exact marathon distance (unrounded).
pub fn long_run_target_km(week: u32) -> f64 {
    if week == RACE_WEEK {
        return MARATHON_KM;
    }

    if week >= TAPER_START_WEEK {
        // Anything past the race week keeps the first taper long run
        return TAPER_LONG_RUN_KM
            .iter()
            .find(|(w, _)| *w == week)
            .map(|(_, km)| *km)
            .unwrap_or(TAPER_LONG_RUN_KM[0].1);
    }

    let mut km = LONG_RUN_START_KM + LONG_RUN_WEEKLY_STEP_KM * (f64::from(week) - 1.0);
    km = clamp(km, LONG_RUN_START_KM, LONG_RUN_MAX_KM);

    if is_cutback_week(week) {
        km *= LONG_RUN_CUTBACK_FACTOR;
    }

    round1(km)
}
