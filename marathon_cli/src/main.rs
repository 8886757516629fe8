use clap::{ArgGroup, Parser, Subcommand};
use marathon_core::calendar::{current_week_number, format_short_date};
use marathon_core::entry::{parse_distance_km, parse_duration};
use marathon_core::format::{day_name, format_km, workout_label};
use marathon_core::pace::{log_entry_pace, sec_to_pace, seconds_to_hms};
use marathon_core::progress::week_completion;
use marathon_core::progression::PLAN_WEEKS;
use marathon_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marathon")]
#[command(about = "24-week marathon training planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User whose record to read and write
    #[arg(long, global = true)]
    user: Option<String>,

    /// Reference date (yyyy-MM-dd), defaults to today
    #[arg(long, global = true)]
    today: Option<IsoDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show progress against the plan and the next workout (default)
    Status,

    /// Show one week of the plan with logged sessions
    Plan {
        /// Week number (1-24), defaults to the current week
        #[arg(long)]
        week: Option<u32>,
    },

    /// Show weekly and long-run distance, planned vs. actual
    Progress,

    /// Record a session (replaces any entry on the same date)
    Log {
        /// Session date, defaults to today
        #[arg(long)]
        date: Option<IsoDate>,

        /// Distance in km, defaults to the planned distance for the date
        #[arg(long)]
        km: Option<String>,

        /// Duration as h:m:s, m:s or seconds
        #[arg(long)]
        time: String,

        /// Optional free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Delete the session logged on a date
    Delete {
        #[arg(long)]
        date: IsoDate,
    },

    /// List recent sessions, newest first
    Logs {
        #[arg(long, default_value_t = 14)]
        limit: usize,
    },

    /// Show plan settings, applying any changes first
    Settings {
        /// Plan start date (week 1, day 1)
        #[arg(long)]
        start: Option<IsoDate>,

        /// Current weekly volume in km
        #[arg(long)]
        base: Option<f64>,

        /// Peak weekly volume cap in km
        #[arg(long)]
        cap: Option<f64>,

        /// Easy pace in minutes per km (6.5 = 6:30/km)
        #[arg(long, conflicts_with = "clear_easy_pace")]
        easy_pace: Option<f64>,

        /// Tempo pace in minutes per km
        #[arg(long, conflicts_with = "clear_tempo_pace")]
        tempo_pace: Option<f64>,

        /// Remove the easy pace and use effort guidance
        #[arg(long)]
        clear_easy_pace: bool,

        /// Remove the tempo pace and use effort guidance
        #[arg(long)]
        clear_tempo_pace: bool,
    },

    /// Replace all settings and logs with defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Export the plan and/or the log as CSV
    #[command(group(ArgGroup::new("target").required(true).multiple(true).args(["plan", "logs"])))]
    Export {
        /// Write the plan to this file
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Write the log to this file
        #[arg(long)]
        logs: Option<PathBuf>,
    },
}

/// Resolved store, user and reference date for one invocation
struct Session {
    store: JsonFileStore,
    user_id: String,
    today: IsoDate,
    defaults: Settings,
}

impl Session {
    fn load(&self) -> AppState {
        load_or_default(&self.store, &self.user_id, self.defaults.clone())
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        self.store.save(&self.user_id, state)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    marathon_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user_id = cli.user.unwrap_or_else(|| config.profile.user_id.clone());
    state::validate_user_id(&user_id)?;
    let today = cli.today.unwrap_or_else(today_local);

    tracing::debug!("Using data dir {:?}, user {}, today {}", data_dir, user_id, today);

    let mut session = Session {
        store: JsonFileStore::new(data_dir.join("state")),
        user_id,
        today,
        defaults: config.defaults.settings(today),
    };

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cmd_status(&session),
        Commands::Plan { week } => cmd_plan(&session, week),
        Commands::Progress => cmd_progress(&session),
        Commands::Log {
            date,
            km,
            time,
            note,
        } => cmd_log(&mut session, date, km.as_deref(), &time, note.as_deref()),
        Commands::Delete { date } => cmd_delete(&mut session, date),
        Commands::Logs { limit } => cmd_logs(&session, limit),
        Commands::Settings {
            start,
            base,
            cap,
            easy_pace,
            tempo_pace,
            clear_easy_pace,
            clear_tempo_pace,
        } => {
            let patch = SettingsPatch {
                plan_start_date: start,
                base_weekly_km: base,
                easy_pace_min_per_km: pace_change(easy_pace, clear_easy_pace),
                tempo_pace_min_per_km: pace_change(tempo_pace, clear_tempo_pace),
                peak_weekly_cap_km: cap,
            };
            cmd_settings(&mut session, patch)
        }
        Commands::Reset { yes } => cmd_reset(&mut session, yes),
        Commands::Export { plan, logs } => cmd_export(&session, plan, logs),
    }
}

fn pace_change(value: Option<f64>, clear: bool) -> Option<Option<f64>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn cmd_status(session: &Session) -> Result<()> {
    let state = session.load();
    let plan = state.plan();
    let summary = aggregate_progress(&plan, &state.logs_by_date, session.today);

    let start = state.settings.plan_start_date;
    match current_week_number(start, session.today) {
        Some(week) => println!("Plan started {} · week {} of {}", start, week, PLAN_WEEKS),
        None if session.today < start => println!("Plan starts {}", start),
        None => println!("Plan started {} · finished", start),
    }

    println!();
    println!("  Planned to date:  {}", format_km(summary.planned_to_date_km));
    println!("  Actual to date:   {}", format_km(summary.actual_to_date_km));
    println!("  Completion:       {}%", summary.completion_pct);
    println!();

    match summary.next_planned {
        Some(day) => {
            println!("Next workout");
            println!(
                "  {} {} · {} · {}",
                day.date,
                day_name(day.day_index),
                workout_label(day.kind),
                format_km(day.planned_km)
            );
            println!("  {}", day.pace_hint);
        }
        None => {
            println!("No workouts left in this plan. Set a new start date with `marathon settings --start`.");
        }
    }

    Ok(())
}

fn cmd_plan(session: &Session, week: Option<u32>) -> Result<()> {
    let state = session.load();
    let plan = state.plan();

    let week_number = week
        .or_else(|| current_week_number(state.settings.plan_start_date, session.today))
        .unwrap_or(1);

    let week = plan.week(week_number).ok_or_else(|| {
        Error::InvalidInput(format!(
            "week must be between 1 and {}, got {}",
            PLAN_WEEKS, week_number
        ))
    })?;
    let completion = week_completion(week, &state.logs_by_date);

    println!(
        "Week {} ({} – {}) · target {}{}",
        week.week_number,
        week.start_date,
        week.end_date,
        format_km(week.target_weekly_km),
        if week.contains(session.today) { " · this week" } else { "" }
    );
    println!(
        "  Logged {} of {} ({}%)",
        format_km(completion.actual_km),
        format_km(completion.planned_km),
        completion.completion_pct
    );
    println!();
    println!(
        "  {:<4} {:<11} {:<9} {:>8}  {:>8}  {:>8}  {:>9}  {}",
        "Day", "Date", "Type", "Planned", "Logged", "Time", "Pace", "Guidance"
    );

    for day in &week.days {
        let logged = state.logs_by_date.get(&day.date);
        println!(
            "  {:<4} {:<11} {:<9} {:>8}  {:>8}  {:>8}  {:>9}  {}",
            day_name(day.day_index),
            format_short_date(day.date),
            workout_label(day.kind),
            format_km(day.planned_km),
            logged.map(|e| format_km(e.distance_km)).unwrap_or_else(|| "-".into()),
            logged.map(|e| seconds_to_hms(e.time_seconds)).unwrap_or_else(|| "-".into()),
            logged.map(log_entry_pace).unwrap_or_else(|| "-".into()),
            day.pace_hint
        );
    }

    Ok(())
}

fn cmd_progress(session: &Session) -> Result<()> {
    let state = session.load();
    let plan = state.plan();
    let summary = aggregate_progress(&plan, &state.logs_by_date, session.today);

    println!(
        "  {:<5} {:>9} {:>9}   {:>10} {:>10}",
        "Week", "Planned", "Actual", "Long plan", "Long done"
    );

    for (weekly, long) in summary.weekly_series.iter().zip(&summary.long_run_series) {
        println!(
            "  {:<5} {:>9} {:>9}   {:>10} {:>10}",
            weekly.label(),
            format_km(weekly.planned),
            format_km(weekly.actual),
            format_km(long.planned),
            format_km(long.actual)
        );
    }

    Ok(())
}

fn cmd_log(
    session: &mut Session,
    date: Option<IsoDate>,
    km: Option<&str>,
    time: &str,
    note: Option<&str>,
) -> Result<()> {
    let date = date.unwrap_or(session.today);
    let mut state = session.load();

    // Validate everything before touching state
    let distance_km = match km {
        Some(km) => parse_distance_km(km)?,
        None => planned_distance_km(&state.plan(), date)?,
    };
    let entry = TrainingLogEntry::new(date, distance_km, parse_duration(time)?, note)?;

    let summary = format!(
        "{} on {} ({}, {})",
        format_km(entry.distance_km),
        entry.date,
        seconds_to_hms(entry.time_seconds),
        log_entry_pace(&entry)
    );
    let replaced = state.record_log(entry);
    session.save(&state)?;

    if replaced.is_some() {
        println!("✓ Updated session: {}", summary);
    } else {
        println!("✓ Session logged: {}", summary);
    }
    Ok(())
}

/// Planned distance for a running day, used when `--km` is omitted
fn planned_distance_km(plan: &Plan, date: IsoDate) -> Result<f64> {
    let day = plan
        .days()
        .find(|d| d.date == date)
        .ok_or_else(|| Error::InvalidInput(format!("{} is not in the plan; pass --km", date)))?;

    if day.kind.is_rest() {
        return Err(Error::InvalidInput(format!(
            "{} is a rest day with no planned distance; pass --km",
            date
        )));
    }
    Ok(day.planned_km)
}

fn cmd_delete(session: &mut Session, date: IsoDate) -> Result<()> {
    let mut state = session.load();

    match state.remove_log(date) {
        Some(_) => {
            session.save(&state)?;
            println!("✓ Deleted session on {}", date);
        }
        None => println!("No session logged on {}", date),
    }
    Ok(())
}

fn cmd_logs(session: &Session, limit: usize) -> Result<()> {
    let state = session.load();
    let recent = state.recent_logs(limit);

    if recent.is_empty() {
        println!("No sessions logged yet. Record one with `marathon log`.");
        return Ok(());
    }

    println!(
        "  {:<10}  {:>8}  {:>8}  {:>9}  {}",
        "Date", "Distance", "Time", "Pace", "Note"
    );
    for entry in recent {
        println!(
            "  {:<10}  {:>8}  {:>8}  {:>9}  {}",
            entry.date,
            format_km(entry.distance_km),
            seconds_to_hms(entry.time_seconds),
            log_entry_pace(entry),
            entry.note.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn cmd_settings(session: &mut Session, patch: SettingsPatch) -> Result<()> {
    let mut state = session.load();

    if !patch.is_empty() {
        patch.validate()?;
        state.update_settings(patch);
        session.save(&state)?;
        println!("✓ Settings updated, plan regenerated");
        println!();
    }

    let settings = &state.settings;
    println!("  Plan start date:   {}", settings.plan_start_date);
    println!("  Base weekly km:    {}", format_km(settings.base_weekly_km));
    println!("  Peak weekly cap:   {}", format_km(settings.peak_weekly_cap_km));
    println!("  Easy pace:         {}", describe_pace(settings.easy_pace_min_per_km));
    println!("  Tempo pace:        {}", describe_pace(settings.tempo_pace_min_per_km));

    if settings.peak_weekly_cap_km < settings.base_weekly_km {
        println!();
        println!("  Note: the cap is below the base volume, so every week stays at the base.");
    }
    Ok(())
}

fn describe_pace(pace: Option<f64>) -> String {
    match pace {
        Some(p) if p.is_finite() && p > 0.0 => format!("{}/km", sec_to_pace(p * 60.0)),
        _ => "not set (effort guidance)".into(),
    }
}

fn cmd_reset(session: &mut Session, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidInput(
            "reset deletes all settings and logs; pass --yes to confirm".into(),
        ));
    }

    let defaults = session.defaults.clone();
    let user_id = session.user_id.clone();
    reset_state(&mut session.store, &user_id, defaults)?;
    println!("✓ All data reset to defaults");
    Ok(())
}

fn cmd_export(session: &Session, plan_path: Option<PathBuf>, logs_path: Option<PathBuf>) -> Result<()> {
    let state = session.load();

    if let Some(path) = plan_path {
        let count = export::export_plan_csv(&state.plan(), &path)?;
        println!("✓ Exported {} plan days to {}", count, path.display());
    }

    if let Some(path) = logs_path {
        let count = export::export_logs_csv(&state.logs_by_date, &path)?;
        println!("✓ Exported {} sessions to {}", count, path.display());
    }

    Ok(())
}
