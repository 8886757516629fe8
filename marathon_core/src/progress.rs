//! Reconciling the plan against logged sessions.
//!
//! Produces the figures a dashboard needs: cumulative planned and actual
//! distance, a completion percentage, per-week chart series and the next
//! workout to do. Non-finite logged distances are skipped rather than
//! poisoning the sums.
//!
//! Note the asymmetry in the to-date figures: planned distance only counts
//! days up to `today`, while actual distance counts every log entry,
//! including ones dated after `today`. Callers that want date-filtered
//! actuals can pass the result of [`logs_through`].

use crate::calendar::round1;
use crate::{IsoDate, LogsByDate, Plan, PlanDay, PlanWeek};
use serde::Serialize;

/// Planned vs. actual distance for one week
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeriesPoint {
    pub week_number: u32,
    pub planned: f64,
    pub actual: f64,
}

impl WeeklySeriesPoint {
    /// Chart label, e.g. `W3`
    pub fn label(&self) -> String {
        format!("W{}", self.week_number)
    }
}

/// Planned vs. actual long run for one week
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LongRunPoint {
    pub week_number: u32,
    pub planned: f64,
    pub actual: f64,
}

/// Aggregated progress figures
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub planned_to_date_km: f64,
    pub actual_to_date_km: f64,
    /// 0..=100
    pub completion_pct: u32,
    pub weekly_series: Vec<WeeklySeriesPoint>,
    pub long_run_series: Vec<LongRunPoint>,
    pub next_planned: Option<PlanDay>,
}

/// Completion of a single week
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekCompletion {
    pub planned_km: f64,
    pub actual_km: f64,
    pub completion_pct: u32,
}

/// `actual / planned` as a whole percentage capped at 100; 0 when nothing is planned
pub fn completion_pct(actual_km: f64, planned_km: f64) -> u32 {
    if planned_km > 0.0 {
        // NaN saturates to 0 in the cast
        (actual_km / planned_km * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

/// Logged distance for `date`, 0 if there is no usable entry
fn logged_km(logs: &LogsByDate, date: IsoDate) -> f64 {
    logs.get(&date)
        .map(|entry| entry.distance_km)
        .filter(|km| km.is_finite())
        .unwrap_or(0.0)
}

/// Merge `plan` with `logs` as of `today`
pub fn aggregate_progress(plan: &Plan, logs: &LogsByDate, today: IsoDate) -> ProgressSummary {
    let planned_to_date: f64 = plan
        .days()
        .filter(|d| d.date <= today)
        .map(|d| d.planned_km)
        .sum();

    let actual_to_date: f64 = logs
        .values()
        .map(|entry| entry.distance_km)
        .filter(|km| km.is_finite())
        .sum();

    let completion = completion_pct(actual_to_date, planned_to_date);

    let weekly_series = plan
        .weeks
        .iter()
        .map(|week| WeeklySeriesPoint {
            week_number: week.week_number,
            planned: round1(week.days.iter().map(|d| d.planned_km).sum()),
            actual: round1(week.days.iter().map(|d| logged_km(logs, d.date)).sum()),
        })
        .collect();

    let long_run_series = plan
        .weeks
        .iter()
        .map(|week| {
            let long_day = week.long_run_day();
            LongRunPoint {
                week_number: week.week_number,
                planned: long_day.map(|d| d.planned_km).unwrap_or(0.0),
                actual: long_day.map(|d| logged_km(logs, d.date)).unwrap_or(0.0),
            }
        })
        .collect();

    let next_planned = next_planned(plan, today).cloned();

    tracing::debug!(
        "Progress as of {}: planned {:.1} km, actual {:.1} km ({}%)",
        today,
        planned_to_date,
        actual_to_date,
        completion
    );

    ProgressSummary {
        planned_to_date_km: round1(planned_to_date),
        actual_to_date_km: round1(actual_to_date),
        completion_pct: completion,
        weekly_series,
        long_run_series,
        next_planned,
    }
}

/// First running day on or after `today`, else the first day of any type
pub fn next_planned(plan: &Plan, today: IsoDate) -> Option<&PlanDay> {
    plan.days()
        .find(|d| d.date >= today && !d.kind.is_rest())
        .or_else(|| plan.days().find(|d| d.date >= today))
}

/// Planned vs. logged distance for one week
pub fn week_completion(week: &PlanWeek, logs: &LogsByDate) -> WeekCompletion {
    let planned: f64 = week.days.iter().map(|d| d.planned_km).sum();
    let actual: f64 = week.days.iter().map(|d| logged_km(logs, d.date)).sum();

    WeekCompletion {
        planned_km: round1(planned),
        actual_km: round1(actual),
        completion_pct: completion_pct(actual, planned),
    }
}

/// Only the entries dated on or before `today`
pub fn logs_through(logs: &LogsByDate, today: IsoDate) -> LogsByDate {
    logs.range(..=today)
        .map(|(date, entry)| (*date, entry.clone()))
        .collect()
}
