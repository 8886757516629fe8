//! 24-week plan generation.
//!
//! The plan is a pure function of `Settings`: no clock, no log data, no
//! caching. Regenerate it whenever settings change.

use crate::calendar::{add_iso_days, round1};
use crate::distribution::{distribute_week, WEEK_TEMPLATE};
use crate::pace::pace_hint;
use crate::progression::{weekly_target_km, PLAN_WEEKS};
use crate::{Plan, PlanDay, PlanWeek, Settings};

/// Build the full dated training calendar
pub fn generate_plan(settings: &Settings) -> Plan {
    let weeks: Vec<PlanWeek> = (1..=PLAN_WEEKS)
        .map(|week_number| build_week(week_number, settings))
        .collect();

    tracing::debug!(
        "Generated {}-week plan from {} (base {} km, cap {} km)",
        weeks.len(),
        settings.plan_start_date,
        settings.base_weekly_km,
        settings.peak_weekly_cap_km
    );

    Plan { weeks }
}

fn build_week(week_number: u32, settings: &Settings) -> PlanWeek {
    let start_date = add_iso_days(settings.plan_start_date, 7 * (i64::from(week_number) - 1));
    let end_date = add_iso_days(start_date, 6);

    let target = weekly_target_km(
        week_number,
        settings.base_weekly_km,
        settings.peak_weekly_cap_km,
    );
    let distribution = distribute_week(week_number, target);

    let days: Vec<PlanDay> = WEEK_TEMPLATE
        .iter()
        .zip(0u8..)
        .map(|(slot, day_index)| {
            let kind = slot.workout_type(&distribution);
            PlanDay {
                date: add_iso_days(start_date, i64::from(day_index)),
                day_index,
                kind,
                planned_km: round1(distribution.km_for(*slot)),
                pace_hint: pace_hint(kind, settings),
            }
        })
        .collect();

    // Authoritative weekly figure: taper and race weeks bypass the formula
    let target_weekly_km = round1(days.iter().map(|d| d.planned_km).sum());

    PlanWeek {
        week_number,
        start_date,
        end_date,
        target_weekly_km,
        days,
    }
}
