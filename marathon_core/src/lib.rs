#![forbid(unsafe_code)]

//! Core planning engine for the 24-week marathon trainer.
//!
//! This crate provides:
//! - Domain types (settings, plan weeks and days, log entries, state)
//! - Calendar arithmetic and one-decimal rounding
//! - Progression rules, weekly workout distribution and pace guidance
//! - Plan generation and progress aggregation
//! - Input parsing, persistence, CSV export and configuration
//!
//! The engine modules are pure: the same `Settings` always yield the same
//! plan, and nothing in them reads the clock or touches the filesystem.

pub mod types;
pub mod error;
pub mod calendar;
pub mod progression;
pub mod distribution;
pub mod pace;
pub mod plan;
pub mod progress;
pub mod entry;
pub mod state;
pub mod export;
pub mod format;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calendar::{add_iso_days, round1, today_local, week_start};
pub use config::Config;
pub use distribution::{distribute_week, WeekDistribution};
pub use pace::pace_hint;
pub use plan::generate_plan;
pub use progress::{aggregate_progress, ProgressSummary};
pub use progression::{long_run_target_km, weekly_target_km};
pub use state::{load_or_default, reset_state, JsonFileStore, MemoryStore, StateStore};
