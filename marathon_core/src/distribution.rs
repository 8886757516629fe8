//! Splitting a week's volume across the fixed 7-day template.
//!
//! Every week runs four sessions on the same slots:
//! rest / easy / rest / tempo / rest / easy / long (Monday slot first).
//! `WEEK_TEMPLATE` is the single source for that layout; plan generation
//! walks it to build the days.

use crate::calendar::round1;
use crate::progression::{is_taper_week, long_run_target_km, RACE_WEEK};
use crate::WorkoutType;

/// Minimum gap between the weekly total and the long run
pub const LONG_RUN_MARGIN_KM: f64 = 8.0;

pub const TEMPO_SHARE: f64 = 0.22;
pub const FIRST_EASY_SHARE: f64 = 0.18;

/// Floor for the second easy run
pub const MIN_SECOND_EASY_KM: f64 = 4.0;

/// Fixed (easy1, tempo, easy2) distances for each taper week
const TAPER_SHORT_RUNS_KM: [(u32, [f64; 3]); 2] = [(22, [6.0, 6.0, 5.0]), (23, [5.0, 5.0, 4.0])];

/// A position in the weekly template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Rest,
    FirstEasy,
    Tempo,
    SecondEasy,
    Long,
}

/// Slot for each day, indexed by `day_index` (0 = Monday slot)
pub const WEEK_TEMPLATE: [Slot; 7] = [
    Slot::Rest,
    Slot::FirstEasy,
    Slot::Rest,
    Slot::Tempo,
    Slot::Rest,
    Slot::SecondEasy,
    Slot::Long,
];

/// Distances for the four running slots of one week
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeekDistribution {
    pub easy1: f64,
    pub tempo: f64,
    pub easy2: f64,
    pub long: f64,
}

impl WeekDistribution {
    /// Distance scheduled for `slot`
    pub fn km_for(&self, slot: Slot) -> f64 {
        match slot {
            Slot::Rest => 0.0,
            Slot::FirstEasy => self.easy1,
            Slot::Tempo => self.tempo,
            Slot::SecondEasy => self.easy2,
            Slot::Long => self.long,
        }
    }

    /// Sum of the four running slots
    pub fn total_km(&self) -> f64 {
        self.easy1 + self.tempo + self.easy2 + self.long
    }
}

impl Slot {
    /// Workout type for this slot; a tempo slot with no distance is a rest day
    pub fn workout_type(self, distribution: &WeekDistribution) -> WorkoutType {
        match self {
            Slot::Rest => WorkoutType::Rest,
            Slot::FirstEasy | Slot::SecondEasy => WorkoutType::Easy,
            Slot::Tempo if distribution.km_for(self) > 0.0 => WorkoutType::Tempo,
            Slot::Tempo => WorkoutType::Rest,
            Slot::Long => WorkoutType::Long,
        }
    }
}

/// Split `target_km` for `week` into the template's running slots
///
/// Taper weeks (22-23) and race week use fixed values and ignore
/// `target_km`. Growth weeks guarantee the total exceeds the long run by at
/// least `LONG_RUN_MARGIN_KM` so the shorter sessions never go negative.
pub fn distribute_week(week: u32, target_km: f64) -> WeekDistribution {
    let long = long_run_target_km(week);

    match week {
        w if is_taper_week(w) => {
            let [easy1, tempo, easy2] = TAPER_SHORT_RUNS_KM
                .iter()
                .find(|(taper_week, _)| *taper_week == w)
                .map(|(_, runs)| *runs)
                .unwrap_or(TAPER_SHORT_RUNS_KM[0].1);

            WeekDistribution {
                easy1,
                tempo,
                easy2,
                long,
            }
        }
        RACE_WEEK => WeekDistribution {
            easy1: 5.0,
            tempo: 0.0,
            easy2: 3.0,
            long,
        },
        _ => {
            let adjusted_target = target_km.max(long + LONG_RUN_MARGIN_KM);
            let tempo = round1(adjusted_target * TEMPO_SHARE);
            let easy1 = round1(adjusted_target * FIRST_EASY_SHARE);
            let easy2 = round1(MIN_SECOND_EASY_KM.max(adjusted_target - long - tempo - easy1));

            WeekDistribution {
                easy1,
                tempo,
                easy2,
                long,
            }
        }
    }
}
