//! The game controller.
//!
//! A `Session` owns exactly one run (`RunState`, `ScoreState`, `RunClock`)
//! plus the long-lived pieces that outlive it: the persistence gateway, the
//! achievement book, preferences and the completed-runs counter. A reset
//! swaps the run-scoped parts for fresh values after cancelling the ticker,
//! so nothing from the previous attempt keeps firing.
//!
//! All timestamps are wall-clock milliseconds supplied by the caller.

use serde::Serialize;
use thiserror::Error;

use crate::achievements::{AchievementBook, AchievementDefinition, RunStats};
use crate::catalog::{self, Element};
use crate::run::{GameMode, RunState};
use crate::scoring::{self, HintSize, HistoryEntry, Rank, RunRecord, ScoreState};
use crate::storage::{DataBundle, ImportError, KeyValueStore, Persistence, Preferences};
use crate::timer::{RunClock, Ticker};
use crate::traversal::{self, Direction, NavDirection};

/// Entries shown by the default leaderboard view.
pub const LEADERBOARD_VIEW: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinishError {
    #[error("answer at least one element before finishing")]
    NothingAnswered,
    #[error("no buffered answers to check")]
    NothingPending,
    #[error("this run is already finished")]
    AlreadyFinalized,
}

/// Result of a finished run, as shown on the results screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub record: RunRecord,
    pub base_score: u32,
    pub bonus_points: u32,
    pub penalty_points: u32,
    pub first_try_count: u32,
    pub hints_used: u32,
    pub new_personal_best: bool,
    pub unlocked: Vec<&'static AchievementDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SubmitOutcome {
    /// Empty guess, no current cell, closed cell or finished run.
    Ignored,
    /// Recall mode: the guess was stored for `check_all`.
    Buffered { atomic: u8, next: Option<u8> },
    Correct {
        atomic: u8,
        points: u32,
        streak: u32,
        next: Option<u8>,
        unlocked: Vec<&'static AchievementDefinition>,
        /// Present when this answer solved the last active cell.
        summary: Option<RunSummary>,
    },
    Incorrect {
        atomic: u8,
        penalty: u32,
        attempts: u32,
        unlocked: Vec<&'static AchievementDefinition>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub atomic: u8,
    pub text: String,
    pub penalty: u32,
}

/// Flat view of everything the HUD renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current: Option<u8>,
    pub solved: Vec<u8>,
    pub pending: Vec<u8>,
    pub wrong: Vec<(u8, u32)>,
    pub active_count: usize,
    pub solved_count: usize,
    pub progress_percent: u32,
    pub accuracy_percent: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub score: u32,
    pub rank: Rank,
    pub rank_color: &'static str,
    pub rank_progress_percent: u32,
    pub points_to_next_rank: Option<u32>,
    pub elapsed_seconds: u32,
    pub elapsed_display: String,
    pub game_mode: GameMode,
    pub nav_direction: NavDirection,
    pub finished: bool,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub total_challenges: u32,
}

pub struct Session<S: KeyValueStore, T: Ticker> {
    run: RunState,
    score: ScoreState,
    clock: RunClock,
    ticker: T,
    finished: Option<RunSummary>,

    persistence: Persistence<S>,
    achievements: AchievementBook,
    prefs: Preferences,
    total_challenges: u32,
}

impl<S: KeyValueStore, T: Ticker> Session<S, T> {
    /// Loads preferences, unlocks and the run counter, then starts a full-table run.
    pub fn new(store: S, ticker: T) -> Self {
        let persistence = Persistence::new(store);
        let mut session = Self {
            run: RunState::full_table(),
            score: ScoreState::default(),
            clock: RunClock::default(),
            ticker,
            finished: None,
            achievements: AchievementBook::default(),
            prefs: Preferences::default(),
            total_challenges: 0,
            persistence,
        };
        session.reload_persisted();
        session.run.current = session.first_open();
        session
    }

    fn reload_persisted(&mut self) {
        self.prefs = self.persistence.load_preferences();
        self.achievements = AchievementBook::from_records(&self.persistence.load_achievements());
        self.total_challenges = self.persistence.load_total_challenges();
    }

    // --- Run lifecycle ---------------------------------------------------------

    /// Throws the current run away and starts over on the same active cells.
    pub fn reset(&mut self) {
        let active = std::mem::take(&mut self.run.active);
        self.restart(RunState::with_active(active));
    }

    /// Starts a fresh run restricted to `active` (unknown numbers are dropped).
    pub fn start_with(&mut self, active: impl IntoIterator<Item = u8>) {
        self.restart(RunState::with_active(active));
    }

    fn restart(&mut self, run: RunState) {
        // cancel first so a stale tick can never touch the new run
        self.ticker.stop();
        self.run = run;
        self.score = ScoreState::default();
        self.clock = RunClock::default();
        self.finished = None;
        self.run.current = self.first_open();
        log::info!("run started with {} active cells", self.run.active.len());
    }

    fn start_clock(&mut self, now_ms: f64) {
        if self.clock.start(now_ms) {
            log::debug!("run clock started");
            self.ticker.start();
        }
    }

    /// Periodic display refresh. Ticks arriving after the run stopped are ignored.
    pub fn tick(&mut self, now_ms: f64) -> Option<u32> {
        if self.finished.is_some() || !self.clock.is_running() {
            return None;
        }
        Some(self.clock.sync(now_ms))
    }

    /// Page hidden: cancel the repeating task, keep the run clock.
    pub fn suspend(&mut self) {
        if self.ticker.is_armed() {
            log::debug!("ticker suspended");
            self.ticker.stop();
        }
    }

    /// Page visible again: re-arm only a running, unarmed timer.
    pub fn resume(&mut self) {
        if self.finished.is_none() && self.clock.is_running() && !self.ticker.is_armed() {
            log::debug!("ticker resumed");
            self.ticker.start();
        }
    }

    // --- Cursor ---------------------------------------------------------------

    pub fn current(&self) -> Option<&'static Element> {
        self.run.current.and_then(catalog::element)
    }

    /// Makes an active cell current. Solved cells can be selected, but not answered.
    pub fn select(&mut self, atomic: u8) -> Option<&'static Element> {
        if self.finished.is_some() || !self.run.is_active(atomic) {
            return None;
        }
        self.run.current = Some(atomic);
        catalog::element(atomic)
    }

    /// Arrow-key move to the visually adjacent active cell.
    pub fn navigate(&mut self, direction: Direction) -> Option<&'static Element> {
        let current = self.current()?;
        let target = traversal::adjacent_cell(current, direction, &self.run.active)?;
        self.select(target.atomic_number)
    }

    fn is_open(&self, atomic: u8) -> bool {
        self.run.is_open(atomic, self.prefs.game_mode)
    }

    fn first_open(&self) -> Option<u8> {
        traversal::first_open(|n| self.is_open(n)).map(|e| e.atomic_number)
    }

    /// Next cell to ask for from `atomic` under the navigation preference.
    pub fn next_open(&self, atomic: u8) -> Option<u8> {
        let from = catalog::element(atomic)?;
        traversal::next_cell_where(from, self.prefs.nav_direction, |n| self.is_open(n))
            .map(|e| e.atomic_number)
    }

    fn advance_from(&mut self, atomic: u8) -> Option<u8> {
        let next = self.next_open(atomic);
        self.run.current = next;
        next
    }

    // --- Answers --------------------------------------------------------------

    /// Handles a typed guess for the current cell.
    pub fn submit(&mut self, guess: &str, now_ms: f64) -> SubmitOutcome {
        let guess = guess.trim();
        if guess.is_empty() || self.finished.is_some() {
            return SubmitOutcome::Ignored;
        }
        let Some(atomic) = self.run.current else {
            return SubmitOutcome::Ignored;
        };
        if !self.run.is_active(atomic) || self.run.is_solved(atomic) {
            return SubmitOutcome::Ignored;
        }

        self.start_clock(now_ms);

        match self.prefs.game_mode {
            GameMode::Recall => {
                self.run.pending.insert(atomic, guess.to_string());
                let next = self.advance_from(atomic);
                SubmitOutcome::Buffered { atomic, next }
            }
            GameMode::Classic => match self.judge(atomic, guess, now_ms) {
                SubmitOutcome::Correct {
                    atomic,
                    points,
                    streak,
                    unlocked,
                    ..
                } => {
                    let (next, summary) = if self.run.is_complete() {
                        (None, Some(self.complete(now_ms)))
                    } else {
                        (self.advance_from(atomic), None)
                    };
                    SubmitOutcome::Correct {
                        atomic,
                        points,
                        streak,
                        next,
                        unlocked,
                        summary,
                    }
                }
                other => other,
            },
        }
    }

    // Scores one answer and re-checks achievements. Shared by classic
    // submissions and recall batch checking.
    fn judge(&mut self, atomic: u8, guess: &str, now_ms: f64) -> SubmitOutcome {
        let Some(element) = catalog::element(atomic) else {
            return SubmitOutcome::Ignored;
        };
        if element.matches_symbol(guess) {
            let first_try = self.run.wrong_attempts_for(atomic) == 0;
            let streak = self.run.record_correct(atomic);
            let points = self.score.add_correct(first_try, streak);
            let unlocked = self.check_achievements(false, now_ms);
            SubmitOutcome::Correct {
                atomic,
                points,
                streak,
                next: None,
                unlocked,
                summary: None,
            }
        } else {
            let attempts = self.run.record_wrong(atomic);
            let penalty = self.score.add_mistake(attempts);
            let unlocked = self.check_achievements(false, now_ms);
            SubmitOutcome::Incorrect {
                atomic,
                penalty,
                attempts,
                unlocked,
            }
        }
    }

    /// Reveals block and category of the current cell for a score penalty.
    pub fn request_hint(&mut self, size: HintSize) -> Option<Hint> {
        if self.finished.is_some() {
            return None;
        }
        let element = self.current()?;
        if self.run.is_solved(element.atomic_number) {
            return None;
        }
        let penalty = self.score.add_hint(size);
        Some(Hint {
            atomic: element.atomic_number,
            text: catalog::hint_text(element),
            penalty,
        })
    }

    /// Recall mode: judges every buffered guess in atomic-number order, then finishes.
    pub fn check_all(&mut self, now_ms: f64) -> Result<RunSummary, FinishError> {
        if self.finished.is_some() {
            return Err(FinishError::AlreadyFinalized);
        }
        if self.run.pending.is_empty() {
            return Err(FinishError::NothingPending);
        }
        let pending = std::mem::take(&mut self.run.pending);
        let mut unlocked = Vec::new();
        for (atomic, guess) in pending {
            if !self.run.is_active(atomic) || self.run.is_solved(atomic) {
                continue;
            }
            match self.judge(atomic, &guess, now_ms) {
                SubmitOutcome::Correct { unlocked: u, .. }
                | SubmitOutcome::Incorrect { unlocked: u, .. } => unlocked.extend(u),
                _ => {}
            }
        }
        let mut summary = self.complete(now_ms);
        unlocked.append(&mut summary.unlocked);
        summary.unlocked = unlocked;
        self.finished = Some(summary.clone());
        Ok(summary)
    }

    /// Ends the run early. Recall mode checks the buffered answers first.
    pub fn finish(&mut self, now_ms: f64) -> Result<RunSummary, FinishError> {
        if self.finished.is_some() {
            return Err(FinishError::AlreadyFinalized);
        }
        match self.prefs.game_mode {
            GameMode::Recall if !self.run.pending.is_empty() => self.check_all(now_ms),
            _ if self.run.solved.is_empty() => Err(FinishError::NothingAnswered),
            _ => Ok(self.complete(now_ms)),
        }
    }

    fn complete(&mut self, now_ms: f64) -> RunSummary {
        self.ticker.stop();
        let elapsed = self.clock.stop(now_ms);
        let completed = self.run.solved.len() as u32;
        let mistakes = self.run.total_mistakes();
        let final_score = self.score.finalize(completed, elapsed, mistakes);

        let record = RunRecord {
            score: final_score,
            rank: Rank::for_score(final_score),
            elements_completed: completed,
            elapsed_seconds: elapsed,
            mistakes,
            accuracy_percent: self.run.accuracy_percent(),
            max_streak: self.run.max_streak,
            timestamp: now_ms.max(0.0) as u64,
        };

        let previous_best = self.persistence.personal_best();
        self.persistence.record_run(&record, self.prefs.game_mode);
        self.total_challenges += 1;
        self.persistence.save_total_challenges(self.total_challenges);
        let unlocked = self.check_achievements(true, now_ms);

        log::info!(
            "run finished: {} points ({}), {}/{} cells in {}s",
            record.score,
            record.rank.name(),
            completed,
            self.run.active.len(),
            elapsed
        );

        let summary = RunSummary {
            new_personal_best: previous_best.is_some_and(|best| record.score > best.score),
            base_score: self.score.base_score,
            bonus_points: self.score.bonus_points,
            penalty_points: self.score.penalty_points,
            first_try_count: self.score.first_try_count,
            hints_used: self.score.hints_used,
            record,
            unlocked,
        };
        self.run.current = None;
        self.finished = Some(summary.clone());
        summary
    }

    fn check_achievements(
        &mut self,
        run_complete: bool,
        now_ms: f64,
    ) -> Vec<&'static AchievementDefinition> {
        let stats = RunStats {
            correct_count: self.run.solved.len() as u32,
            total_mistakes: self.run.total_mistakes(),
            elapsed_seconds: self.clock.sync(now_ms),
            score: self.score.score,
            max_streak: self.run.max_streak,
            is_run_complete: run_complete,
            total_runs_completed: self.total_challenges,
        };
        let fresh = self.achievements.unlock_new(&stats, now_ms.max(0.0) as u64);
        if !fresh.is_empty() {
            self.persistence
                .save_achievements(&self.achievements.to_records());
        }
        fresh
    }

    // --- Preferences ----------------------------------------------------------

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn set_nav_direction(&mut self, nav: NavDirection) {
        self.prefs.nav_direction = nav;
        self.persistence.save_preferences(self.prefs);
    }

    /// Switching mode keeps buffered answers; they only count again in recall mode.
    pub fn set_game_mode(&mut self, mode: GameMode) {
        self.prefs.game_mode = mode;
        self.persistence.save_preferences(self.prefs);
    }

    // --- Queries --------------------------------------------------------------

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.finished.as_ref()
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    pub fn total_challenges(&self) -> u32 {
        self.total_challenges
    }

    pub fn top_scores(&self, limit: usize) -> Vec<RunRecord> {
        self.persistence.top_scores(limit)
    }

    pub fn personal_best(&self) -> Option<RunRecord> {
        self.persistence.personal_best()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.persistence.load_history()
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn snapshot(&self) -> Snapshot {
        let score = self.score.score;
        let rank = self.score.rank();
        let elapsed = self.clock.elapsed_secs();
        Snapshot {
            current: self.run.current,
            solved: self.run.solved.iter().copied().collect(),
            pending: self.run.pending.keys().copied().collect(),
            wrong: self
                .run
                .wrong_attempts
                .iter()
                .map(|(atomic, count)| (*atomic, *count))
                .collect(),
            active_count: self.run.active.len(),
            solved_count: self.run.solved.len(),
            progress_percent: self.run.progress_percent(),
            accuracy_percent: self.run.accuracy_percent(),
            streak: self.run.streak,
            max_streak: self.run.max_streak,
            score,
            rank,
            rank_color: rank.color(),
            rank_progress_percent: scoring::rank_progress_percent(score),
            points_to_next_rank: scoring::points_to_next_rank(score),
            elapsed_seconds: elapsed,
            elapsed_display: scoring::format_time(elapsed),
            game_mode: self.prefs.game_mode,
            nav_direction: self.prefs.nav_direction,
            finished: self.finished.is_some(),
            achievements_unlocked: self.achievements.unlocked_count(),
            achievements_total: self.achievements.total_count(),
            total_challenges: self.total_challenges,
        }
    }

    // --- Data management ------------------------------------------------------

    pub fn export_data(&self) -> Result<String, serde_json::Error> {
        self.persistence.export_bundle().to_json()
    }

    /// Validates the whole document before writing anything.
    pub fn import_data(&mut self, raw: &str) -> Result<(), ImportError> {
        let bundle = match DataBundle::from_json(raw) {
            Ok(bundle) => bundle,
            Err(e) => {
                log::warn!("import rejected: {e}");
                return Err(e);
            }
        };
        self.persistence.import_bundle(&bundle);
        self.reload_persisted();
        log::info!("imported saved data");
        Ok(())
    }

    /// Erases every stored key and returns to defaults. The current run keeps going.
    pub fn reset_all_data(&mut self) {
        self.persistence.clear_all();
        self.reload_persisted();
        log::info!("all saved data cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::timer::ManualTicker;

    fn session() -> Session<MemoryStore, ManualTicker> {
        Session::new(MemoryStore::new(), ManualTicker::default())
    }

    fn symbol(atomic: u8) -> &'static str {
        catalog::element(atomic).map(|e| e.symbol).unwrap()
    }

    #[test]
    fn starts_on_hydrogen() {
        let s = session();
        assert_eq!(s.run().current, Some(1));
        assert!(!s.ticker().is_armed());
    }

    #[test]
    fn blank_guess_changes_nothing() {
        let mut s = session();
        assert_eq!(s.submit("   ", 0.0), SubmitOutcome::Ignored);
        assert_eq!(s.run().total_attempts, 0);
        assert!(!s.ticker().is_armed());
    }

    #[test]
    fn solved_cell_is_read_only() {
        let mut s = session();
        s.submit("H", 0.0);
        let before = (s.run().total_attempts, s.run().streak, s.score().score);
        assert_eq!(s.select(1).map(|e| e.symbol), Some("H"));
        assert_eq!(s.submit("xx", 500.0), SubmitOutcome::Ignored);
        assert_eq!(s.submit("H", 600.0), SubmitOutcome::Ignored);
        assert_eq!((s.run().total_attempts, s.run().streak, s.score().score), before);
        assert!(s.run().wrong_attempts.is_empty());
        assert_eq!(s.run().current, Some(1));
    }

    #[test]
    fn correct_answer_scores_and_advances() {
        let mut s = session();
        match s.submit(" h ", 1_000.0) {
            SubmitOutcome::Correct {
                atomic,
                points,
                streak,
                next,
                unlocked,
                summary,
            } => {
                assert_eq!(atomic, 1);
                assert_eq!(points, 50);
                assert_eq!(streak, 1);
                assert_eq!(next, Some(2));
                assert_eq!(unlocked.len(), 1);
                assert!(summary.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.ticker().is_armed());
        assert!(s.achievements().is_unlocked("first_element"));
    }

    #[test]
    fn wrong_answer_keeps_cell_and_escalates() {
        let mut s = session();
        let penalties: Vec<u32> = (0..3)
            .map(|_| match s.submit("Xx", 0.0) {
                SubmitOutcome::Incorrect { penalty, .. } => penalty,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(penalties, vec![50, 100, 200]);
        assert_eq!(s.run().current, Some(1));
        assert_eq!(s.score().score, 0);
        assert_eq!(s.ticker().arm_count, 1);
    }

    #[test]
    fn hint_needs_open_current_cell() {
        let mut s = session();
        let hint = s.request_hint(HintSize::Medium).unwrap();
        assert_eq!(hint.text, "Block: S-block | Category: nonmetal");
        assert_eq!(hint.penalty, 50);
        assert_eq!(s.score().hints_used, 1);

        s.start_with([1]);
        s.submit("H", 0.0);
        assert!(s.request_hint(HintSize::Small).is_none());
    }

    #[test]
    fn finish_early_requires_an_answer() {
        let mut s = session();
        assert_eq!(s.finish(0.0), Err(FinishError::NothingAnswered));
        s.submit("H", 0.0);
        let summary = s.finish(10_000.0).unwrap();
        assert_eq!(summary.record.elements_completed, 1);
        assert!(!summary.new_personal_best);
        assert_eq!(s.finish(20_000.0), Err(FinishError::AlreadyFinalized));
        assert_eq!(s.submit("He", 0.0), SubmitOutcome::Ignored);
        assert!(!s.ticker().is_armed());
    }

    #[test]
    fn stale_tick_after_reset_is_ignored() {
        let mut s = session();
        s.submit("H", 0.0);
        assert_eq!(s.tick(2_500.0), Some(2));
        s.reset();
        assert!(!s.ticker().is_armed());
        assert_eq!(s.tick(5_000.0), None);
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.run().current, Some(1));
    }

    #[test]
    fn suspend_and_resume_never_double_arm() {
        let mut s = session();
        s.resume();
        assert!(!s.ticker().is_armed());
        s.submit("H", 0.0);
        s.suspend();
        assert!(!s.ticker().is_armed());
        s.resume();
        s.resume();
        assert!(s.ticker().is_armed());
        assert_eq!(s.ticker().arm_count, 2);
    }

    #[test]
    fn last_cell_finalizes_restricted_run() {
        let mut s = session();
        s.start_with([6, 7]);
        assert_eq!(s.run().current, Some(6));
        s.submit(symbol(6), 0.0);
        match s.submit(symbol(7), 30_000.0) {
            SubmitOutcome::Correct { summary: Some(summary), next, .. } => {
                assert_eq!(next, None);
                assert_eq!(summary.record.elapsed_seconds, 30);
                assert_eq!(summary.record.max_streak, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.is_finished());
        assert_eq!(s.total_challenges(), 1);
        assert_eq!(s.history()[0].mode, "Full Table");
    }

    #[test]
    fn select_and_navigate_stay_on_active_cells() {
        let mut s = session();
        assert_eq!(s.select(26).map(|e| e.symbol), Some("Fe"));
        assert_eq!(s.navigate(Direction::Right).map(|e| e.symbol), Some("Co"));
        assert!(s.select(0).is_none());
        s.start_with([26]);
        assert!(s.select(27).is_none());
    }

    #[test]
    fn recall_buffers_then_checks_in_order() {
        let mut s = session();
        s.set_game_mode(GameMode::Recall);
        s.start_with([1, 2, 3]);
        assert_eq!(s.finish(0.0), Err(FinishError::NothingAnswered));
        assert_eq!(s.check_all(0.0), Err(FinishError::NothingPending));

        assert_eq!(
            s.submit("h", 0.0),
            SubmitOutcome::Buffered { atomic: 1, next: Some(2) }
        );
        assert_eq!(
            s.submit("Ne", 500.0),
            SubmitOutcome::Buffered { atomic: 2, next: Some(3) }
        );
        assert_eq!(s.score().score, 0);

        let summary = s.check_all(4_000.0).unwrap();
        assert_eq!(summary.record.elements_completed, 1);
        assert_eq!(summary.record.mistakes, 1);
        assert_eq!(summary.penalty_points, 50);
        assert!(s.run().pending.is_empty());
        assert_eq!(s.history()[0].mode, "Recall");
    }

    #[test]
    fn preferences_persist_across_sessions() {
        let mut s = session();
        s.set_nav_direction(NavDirection::Vertical);
        s.set_game_mode(GameMode::Recall);
        assert_eq!(s.store().raw("navDirection").as_deref(), Some("vertical"));

        let store = MemoryStore::new();
        store.set("gameMode", "recall").unwrap();
        let reopened = Session::new(store, ManualTicker::default());
        assert_eq!(reopened.preferences().game_mode, GameMode::Recall);
        assert_eq!(reopened.preferences().nav_direction, NavDirection::Horizontal);
    }

    #[test]
    fn snapshot_reflects_live_state() {
        let mut s = session();
        s.submit("H", 0.0);
        s.submit("x", 1_000.0);
        let snap = s.snapshot();
        assert_eq!(snap.current, Some(2));
        assert_eq!(snap.solved, vec![1]);
        assert_eq!(snap.wrong, vec![(2, 1)]);
        assert_eq!(snap.accuracy_percent, 50);
        assert_eq!(snap.elapsed_display, "00:01");
        assert_eq!(snap.rank, Rank::Novice);
    }
}
