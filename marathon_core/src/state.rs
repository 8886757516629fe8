//! Application state mutation and persistence.
//!
//! The engine never persists anything itself; hosts go through a
//! `StateStore`. Stores are last-writer-wins: a save replaces the whole
//! record. Missing, wrong-version or malformed records are reported as
//! absent and replaced with defaults, never surfaced as errors.

use crate::plan::generate_plan;
use crate::{
    AppState, Error, IsoDate, Plan, Result, Settings, SettingsPatch, TrainingLogEntry,
};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

impl AppState {
    /// Insert or replace the entry for the entry's date
    ///
    /// Returns the entry it replaced, if any.
    pub fn record_log(&mut self, entry: TrainingLogEntry) -> Option<TrainingLogEntry> {
        tracing::debug!("Recording {} km on {}", entry.distance_km, entry.date);
        self.logs_by_date.insert(entry.date, entry)
    }

    /// Remove the entry for `date`
    pub fn remove_log(&mut self, date: IsoDate) -> Option<TrainingLogEntry> {
        self.logs_by_date.remove(&date)
    }

    /// Apply a partial settings update
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    /// Most recent entries first
    pub fn recent_logs(&self, limit: usize) -> Vec<&TrainingLogEntry> {
        self.logs_by_date.values().rev().take(limit).collect()
    }

    /// Plan for the current settings
    pub fn plan(&self) -> Plan {
        generate_plan(&self.settings)
    }

    /// Decode a stored record, `None` if it is not a usable version-1 record
    pub fn decode(contents: &str) -> Option<Self> {
        match serde_json::from_str::<AppState>(contents) {
            Ok(state) if state.version == Self::CURRENT_VERSION => Some(state),
            Ok(state) => {
                tracing::warn!(
                    "Unsupported state version {}, treating as absent",
                    state.version
                );
                None
            }
            Err(e) => {
                tracing::warn!("Malformed state record: {}. Treating as absent.", e);
                None
            }
        }
    }

    /// Encode as a compact JSON record
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Persistence collaborator for per-user state
pub trait StateStore {
    /// Load the stored state; `Ok(None)` when absent or unusable
    fn load(&self, user_id: &str) -> Result<Option<AppState>>;

    /// Replace the stored state
    fn save(&mut self, user_id: &str, state: &AppState) -> Result<()>;
}

/// Check a user id is safe to use as a record key and file name
pub fn validate_user_id(user_id: &str) -> Result<()> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "user id '{}' must be non-empty and use only letters, digits, '-' or '_'",
            user_id
        )))
    }
}

/// Load state or fall back to defaults
///
/// Store errors are logged and treated like an absent record.
pub fn load_or_default<S: StateStore + ?Sized>(
    store: &S,
    user_id: &str,
    defaults: Settings,
) -> AppState {
    match store.load(user_id) {
        Ok(Some(state)) => state,
        Ok(None) => {
            tracing::info!("No stored state for {}, using defaults", user_id);
            AppState::new(defaults)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load state for {}: {}. Using defaults.",
                user_id,
                e
            );
            AppState::new(defaults)
        }
    }
}

/// Overwrite the stored state with a fresh default state
pub fn reset_state<S: StateStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    defaults: Settings,
) -> Result<AppState> {
    let state = AppState::new(defaults);
    store.save(user_id, &state)?;
    tracing::info!("Reset state for {}", user_id);
    Ok(state)
}

// ============================================================================
// JSON file store
// ============================================================================

/// One JSON file per user, written atomically under file locks
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for `user_id`
    pub fn path_for(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.dir.join(format!("{}.json", user_id)))
    }

    fn read_locked(path: &Path) -> Result<String> {
        let file = File::open(path)?;

        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut contents);

        file.unlock()?;
        read?;
        Ok(contents)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, user_id: &str) -> Result<Option<AppState>> {
        let path = self.path_for(user_id)?;

        if !path.exists() {
            tracing::info!("No state file found at {:?}", path);
            return Ok(None);
        }

        let contents = match Self::read_locked(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read state file {:?}: {}", path, e);
                return Ok(None);
            }
        };

        let state = AppState::decode(&contents);
        if state.is_some() {
            tracing::debug!("Loaded state from {:?}", path);
        }
        Ok(state)
    }

    /// Atomically writes state by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&mut self, user_id: &str, state: &AppState) -> Result<()> {
        let path = self.path_for(user_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Exclusive lock on the temp file serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(state.encode()?.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved state for {} to {:?}", user_id, path);
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps encoded records in memory; same semantics as the file store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record as-is, bypassing encoding
    pub fn insert_raw(&mut self, user_id: &str, contents: impl Into<String>) {
        self.records.insert(user_id.to_string(), contents.into());
    }
}

impl StateStore for MemoryStore {
    fn load(&self, user_id: &str) -> Result<Option<AppState>> {
        validate_user_id(user_id)?;
        Ok(self
            .records
            .get(user_id)
            .and_then(|contents| AppState::decode(contents)))
    }

    fn save(&mut self, user_id: &str, state: &AppState) -> Result<()> {
        validate_user_id(user_id)?;
        self.records.insert(user_id.to_string(), state.encode()?);
        Ok(())
    }
}
