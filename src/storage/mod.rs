//! Persistence gateway.
//!
//! The core only needs get / set / remove on string values under a handful
//! of fixed keys. `Persistence` layers the JSON schema on top of any
//! `KeyValueStore` and absorbs every failure: a failed or corrupt read is
//! "no data yet", a failed write is dropped with a warning. Scoring and
//! achievement code never see a storage error.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::UnlockRecord;
use crate::run::GameMode;
use crate::scoring::{self, HistoryEntry, RunRecord};
use crate::traversal::NavDirection;

mod bundle;
#[cfg(target_arch = "wasm32")]
mod browser;

pub use bundle::{DataBundle, EXPORT_VERSION, ImportError};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;

// --- Keys -------------------------------------------------------------------------

pub const KEY_ACHIEVEMENTS: &str = "achievements";
pub const KEY_LEADERBOARD: &str = "leaderboard";
pub const KEY_HISTORY: &str = "history";
pub const KEY_TOTAL_CHALLENGES: &str = "totalChallenges";
pub const KEY_NAV_DIRECTION: &str = "navDirection";
pub const KEY_GAME_MODE: &str = "gameMode";

/// Every key owned by the app; wiped together by a full data reset.
pub const ALL_KEYS: [&str; 6] = [
    KEY_ACHIEVEMENTS,
    KEY_LEADERBOARD,
    KEY_HISTORY,
    KEY_TOTAL_CHALLENGES,
    KEY_NAV_DIRECTION,
    KEY_GAME_MODE,
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected `{key}`: {reason}")]
    Rejected { key: String, reason: String },
    #[error("could not encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value store that survives across sessions.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for native hosts and tests. Can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable);
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable);
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// --- Preferences ------------------------------------------------------------------

/// Per-user settings, persisted as bare strings (not JSON-quoted).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub nav_direction: NavDirection,
    pub game_mode: GameMode,
}

// --- Typed gateway ----------------------------------------------------------------

pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("read of `{key}` failed, treating as empty: {e}");
                None
            }
        }
    }

    fn write_raw(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("write of `{key}` dropped: {e}");
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("discarding corrupt `{key}`: {e}");
                None
            }
        }
    }

    /// Lists are validated row by row; malformed rows are dropped.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let rows: Vec<serde_json::Value> = self.read_json(key)?;
        let total = rows.len();
        let parsed: Vec<T> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        if parsed.len() < total {
            log::warn!("dropped {} malformed rows from `{key}`", total - parsed.len());
        }
        Some(parsed)
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.write_raw(key, &raw),
            Err(source) => {
                let e = StoreError::Encode {
                    key: key.to_string(),
                    source,
                };
                log::warn!("write of `{key}` dropped: {e}");
            }
        }
    }

    pub fn load_achievements(&self) -> Vec<UnlockRecord> {
        self.read_list(KEY_ACHIEVEMENTS).unwrap_or_default()
    }

    pub fn save_achievements(&self, records: &[UnlockRecord]) {
        self.write_json(KEY_ACHIEVEMENTS, records);
    }

    pub fn load_leaderboard(&self) -> Vec<RunRecord> {
        self.read_list(KEY_LEADERBOARD).unwrap_or_default()
    }

    pub fn save_leaderboard(&self, board: &[RunRecord]) {
        self.write_json(KEY_LEADERBOARD, board);
    }

    pub fn load_history(&self) -> Vec<HistoryEntry> {
        self.read_list(KEY_HISTORY).unwrap_or_default()
    }

    pub fn save_history(&self, history: &[HistoryEntry]) {
        self.write_json(KEY_HISTORY, history);
    }

    pub fn load_total_challenges(&self) -> u32 {
        self.read_json(KEY_TOTAL_CHALLENGES).unwrap_or(0)
    }

    pub fn save_total_challenges(&self, total: u32) {
        self.write_raw(KEY_TOTAL_CHALLENGES, &total.to_string());
    }

    pub fn load_preferences(&self) -> Preferences {
        let nav_direction = self
            .read_raw(KEY_NAV_DIRECTION)
            .and_then(|raw| NavDirection::parse(&raw))
            .unwrap_or_default();
        let game_mode = self
            .read_raw(KEY_GAME_MODE)
            .and_then(|raw| GameMode::parse(&raw))
            .unwrap_or_default();
        Preferences {
            nav_direction,
            game_mode,
        }
    }

    pub fn save_preferences(&self, prefs: Preferences) {
        self.write_raw(KEY_NAV_DIRECTION, prefs.nav_direction.as_str());
        self.write_raw(KEY_GAME_MODE, prefs.game_mode.as_str());
    }

    /// Appends a finished run to both the leaderboard and the history.
    pub fn record_run(&self, record: &RunRecord, mode: GameMode) {
        let mut board = self.load_leaderboard();
        scoring::insert_leaderboard(&mut board, record.clone());
        self.save_leaderboard(&board);

        let mut history = self.load_history();
        let entry = HistoryEntry {
            mode: mode.history_label().to_string(),
            record: record.clone(),
        };
        scoring::insert_history(&mut history, entry);
        self.save_history(&history);
    }

    pub fn top_scores(&self, limit: usize) -> Vec<RunRecord> {
        let mut board = self.load_leaderboard();
        board.truncate(limit);
        board
    }

    pub fn personal_best(&self) -> Option<RunRecord> {
        self.load_leaderboard()
            .into_iter()
            .reduce(|best, r| if r.score > best.score { r } else { best })
    }

    pub fn clear_all(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.store.remove(key) {
                log::warn!("could not remove `{key}`: {e}");
            }
        }
    }

    /// Snapshot of every stored key.
    pub fn export_bundle(&self) -> DataBundle {
        let has = |key: &str| self.read_raw(key).is_some();
        DataBundle {
            version: Some(EXPORT_VERSION),
            achievements: has(KEY_ACHIEVEMENTS).then(|| self.load_achievements()),
            leaderboard: has(KEY_LEADERBOARD).then(|| self.load_leaderboard()),
            history: has(KEY_HISTORY).then(|| self.load_history()),
            total_challenges: self.read_json(KEY_TOTAL_CHALLENGES),
            nav_direction: self
                .read_raw(KEY_NAV_DIRECTION)
                .and_then(|raw| NavDirection::parse(&raw)),
            game_mode: self
                .read_raw(KEY_GAME_MODE)
                .and_then(|raw| GameMode::parse(&raw)),
        }
    }

    /// Writes every key present in the bundle; absent keys are left alone.
    pub fn import_bundle(&self, bundle: &DataBundle) {
        if let Some(achievements) = &bundle.achievements {
            self.save_achievements(achievements);
        }
        if let Some(board) = &bundle.leaderboard {
            let mut board = board.clone();
            board.sort_by(|a, b| b.score.cmp(&a.score));
            board.truncate(scoring::LEADERBOARD_CAP);
            self.save_leaderboard(&board);
        }
        if let Some(history) = &bundle.history {
            let mut history = history.clone();
            history.truncate(scoring::HISTORY_CAP);
            self.save_history(&history);
        }
        if let Some(total) = bundle.total_challenges {
            self.save_total_challenges(total);
        }
        if let Some(nav) = bundle.nav_direction {
            self.write_raw(KEY_NAV_DIRECTION, nav.as_str());
        }
        if let Some(mode) = bundle.game_mode {
            self.write_raw(KEY_GAME_MODE, mode.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Rank;

    fn record(score: u32) -> RunRecord {
        RunRecord {
            score,
            rank: Rank::for_score(score),
            elements_completed: 118,
            elapsed_seconds: 400,
            mistakes: 2,
            accuracy_percent: 98,
            max_streak: 60,
            timestamp: 1,
        }
    }

    #[test]
    fn missing_keys_load_as_defaults() {
        let p = Persistence::new(MemoryStore::new());
        assert!(p.load_leaderboard().is_empty());
        assert!(p.load_history().is_empty());
        assert_eq!(p.load_total_challenges(), 0);
        assert_eq!(p.load_preferences(), Preferences::default());
    }

    #[test]
    fn corrupt_json_is_treated_as_absent() {
        let store = MemoryStore::new();
        store.set(KEY_LEADERBOARD, "{not json").unwrap();
        store.set(KEY_TOTAL_CHALLENGES, "many").unwrap();
        store.set(KEY_NAV_DIRECTION, "diagonal").unwrap();
        let p = Persistence::new(store);
        assert!(p.load_leaderboard().is_empty());
        assert_eq!(p.load_total_challenges(), 0);
        assert_eq!(p.load_preferences().nav_direction, NavDirection::Horizontal);
    }

    #[test]
    fn malformed_rows_are_dropped_individually() {
        let store = MemoryStore::new();
        let good = serde_json::to_string(&record(10)).unwrap();
        store
            .set(KEY_LEADERBOARD, &format!("[{good}, {{\"score\": \"x\"}}]"))
            .unwrap();
        let p = Persistence::new(store);
        assert_eq!(p.load_leaderboard(), vec![record(10)]);
    }

    #[test]
    fn failing_store_degrades_silently() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let p = Persistence::new(store);
        p.record_run(&record(5), GameMode::Classic);
        p.save_total_challenges(3);
        assert!(p.store().is_empty());
        p.store().set_fail_reads(true);
        assert_eq!(p.load_total_challenges(), 0);
    }

    #[test]
    fn preferences_are_stored_as_bare_strings() {
        let p = Persistence::new(MemoryStore::new());
        p.save_preferences(Preferences {
            nav_direction: NavDirection::Vertical,
            game_mode: GameMode::Recall,
        });
        assert_eq!(p.store().raw(KEY_NAV_DIRECTION).as_deref(), Some("vertical"));
        assert_eq!(p.store().raw(KEY_GAME_MODE).as_deref(), Some("recall"));
        assert_eq!(p.load_preferences().game_mode, GameMode::Recall);
    }

    #[test]
    fn record_run_feeds_leaderboard_and_history() {
        let p = Persistence::new(MemoryStore::new());
        p.record_run(&record(300), GameMode::Classic);
        p.record_run(&record(900), GameMode::Recall);
        p.record_run(&record(100), GameMode::Classic);
        let scores: Vec<u32> = p.load_leaderboard().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![900, 300, 100]);
        let history = p.load_history();
        assert_eq!(history[0].record.score, 100);
        assert_eq!(history[1].mode, "Recall");
        assert_eq!(p.top_scores(2).len(), 2);
        assert_eq!(p.personal_best().map(|r| r.score), Some(900));
    }

    #[test]
    fn clear_all_removes_every_key() {
        let p = Persistence::new(MemoryStore::new());
        p.record_run(&record(1), GameMode::Classic);
        p.save_total_challenges(1);
        p.save_preferences(Preferences::default());
        p.save_achievements(&[]);
        assert_eq!(p.store().len(), ALL_KEYS.len());
        p.clear_all();
        assert!(p.store().is_empty());
    }
}
