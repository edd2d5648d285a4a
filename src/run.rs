//! Per-run attempt tracking: which cells are in play, which are solved, how
//! often each cell was missed, and the streak counters.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog;

/// How a guess is judged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Every submission is validated immediately.
    #[default]
    Classic,
    /// Submissions are buffered and validated together by "check all".
    Recall,
}

impl GameMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Recall => "recall",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "classic" => Some(GameMode::Classic),
            "recall" => Some(GameMode::Recall),
            _ => None,
        }
    }

    /// Label stored with history entries.
    pub const fn history_label(self) -> &'static str {
        match self {
            GameMode::Classic => "Full Table",
            GameMode::Recall => "Recall",
        }
    }
}

/// Mutable state of one challenge attempt. Replaced wholesale on reset.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    pub active: BTreeSet<u8>,
    pub solved: BTreeSet<u8>,
    pub wrong_attempts: BTreeMap<u8, u32>,
    pub pending: BTreeMap<u8, String>,
    pub streak: u32,
    pub max_streak: u32,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub current: Option<u8>,
}

impl RunState {
    /// Full-table run: all 118 cells active.
    pub fn full_table() -> Self {
        Self::with_active(catalog::all_atomic_numbers())
    }

    pub fn with_active(active: impl IntoIterator<Item = u8>) -> Self {
        Self {
            active: active
                .into_iter()
                .filter(|n| catalog::element(*n).is_some())
                .collect(),
            ..Self::default()
        }
    }

    pub fn is_active(&self, atomic: u8) -> bool {
        self.active.contains(&atomic)
    }

    pub fn is_solved(&self, atomic: u8) -> bool {
        self.solved.contains(&atomic)
    }

    /// Still waiting for an answer. In recall mode a buffered guess counts as answered.
    pub fn is_open(&self, atomic: u8, mode: GameMode) -> bool {
        self.is_active(atomic)
            && !self.is_solved(atomic)
            && !(mode == GameMode::Recall && self.pending.contains_key(&atomic))
    }

    pub fn wrong_attempts_for(&self, atomic: u8) -> u32 {
        self.wrong_attempts.get(&atomic).copied().unwrap_or(0)
    }

    /// Records a correct answer and returns the streak after the increment.
    pub fn record_correct(&mut self, atomic: u8) -> u32 {
        debug_assert!(self.is_active(atomic));
        self.total_attempts += 1;
        self.correct_attempts += 1;
        self.solved.insert(atomic);
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        self.streak
    }

    /// Records a miss and returns how many times this cell has now been missed.
    pub fn record_wrong(&mut self, atomic: u8) -> u32 {
        self.total_attempts += 1;
        self.streak = 0;
        let count = self.wrong_attempts.entry(atomic).or_insert(0);
        *count += 1;
        *count
    }

    pub fn total_mistakes(&self) -> u32 {
        self.wrong_attempts.values().sum()
    }

    /// Rounded percentage of correct submissions; 100 before the first attempt.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_attempts == 0 {
            return 100;
        }
        (self.correct_attempts as f64 / self.total_attempts as f64 * 100.0).round() as u32
    }

    /// Rounded share of active cells already solved.
    pub fn progress_percent(&self) -> u32 {
        if self.active.is_empty() {
            return 0;
        }
        (self.solved.len() as f64 / self.active.len() as f64 * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        !self.active.is_empty() && self.solved.len() == self.active.len()
    }
}
