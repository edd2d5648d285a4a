//! Scoring rules, rank tiers, and the persisted run records.
//!
//! Scoring is two-phase. During play `ScoreState::score` is nudged up and down
//! for live feedback. At finalization it is thrown away and rebuilt from the
//! throughput base score plus the accumulated bonus and penalty sums, so the
//! bonus/penalty totals effectively count twice relative to the live score.

use serde::{Deserialize, Serialize};

use crate::catalog::ELEMENT_COUNT;

// --- Constants ------------------------------------------------------------------

pub const BASE_MULTIPLIER: f64 = 1000.0;
pub const FIRST_TRY_BONUS: u32 = 50;
pub const STREAK_BONUS: u32 = 10;
/// Streak multiplier stops growing here.
pub const STREAK_CAP: u32 = 10;
pub const PERFECT_BONUS: u32 = 1000;
pub const SPEED_BONUS: u32 = 500;
/// Full table under five minutes earns the speed bonus.
pub const SPEED_BONUS_LIMIT_SECS: u32 = 300;

pub const MISTAKE_PENALTY_FIRST: u32 = 50;
pub const MISTAKE_PENALTY_SECOND: u32 = 100;
pub const MISTAKE_PENALTY_REPEAT: u32 = 200;

pub const LEADERBOARD_CAP: usize = 100;
pub const HISTORY_CAP: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl HintSize {
    pub const fn penalty(self) -> u32 {
        match self {
            HintSize::Small => 25,
            HintSize::Medium => 50,
            HintSize::Large => 150,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "small" => Some(HintSize::Small),
            "medium" => Some(HintSize::Medium),
            "large" => Some(HintSize::Large),
            _ => None,
        }
    }
}

/// Penalty for the n-th miss (1-based) on one cell.
pub const fn mistake_penalty(mistake_number: u32) -> u32 {
    match mistake_number {
        0 | 1 => MISTAKE_PENALTY_FIRST,
        2 => MISTAKE_PENALTY_SECOND,
        _ => MISTAKE_PENALTY_REPEAT,
    }
}

/// Throughput score: elements per second scaled by 1000, 0 when no time elapsed.
pub fn base_score(elements_completed: u32, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    (elements_completed as f64 / elapsed_secs as f64 * BASE_MULTIPLIER).round() as u32
}

// --- Score state ------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    /// Live score during play, rebuilt by `finalize`. Never negative.
    pub score: u32,
    pub base_score: u32,
    pub bonus_points: u32,
    pub penalty_points: u32,
    pub first_try_count: u32,
    pub hints_used: u32,
}

impl ScoreState {
    /// Awards a correct answer. `streak` is the run streak after this answer.
    pub fn add_correct(&mut self, first_try: bool, streak: u32) -> u32 {
        let mut points = 0;
        if first_try {
            points += FIRST_TRY_BONUS;
            self.first_try_count += 1;
        }
        if streak > 1 {
            points += STREAK_BONUS * streak.min(STREAK_CAP);
        }
        self.bonus_points += points;
        self.score += points;
        points
    }

    /// Charges the n-th miss on a cell and returns the penalty applied.
    pub fn add_mistake(&mut self, mistake_number: u32) -> u32 {
        self.charge(mistake_penalty(mistake_number))
    }

    pub fn add_hint(&mut self, size: HintSize) -> u32 {
        self.hints_used += 1;
        self.charge(size.penalty())
    }

    fn charge(&mut self, penalty: u32) -> u32 {
        self.penalty_points += penalty;
        self.score = self.score.saturating_sub(penalty);
        penalty
    }

    /// Recomputes the score from scratch for the end of a run.
    pub fn finalize(
        &mut self,
        elements_completed: u32,
        elapsed_secs: u32,
        total_mistakes: u32,
    ) -> u32 {
        self.base_score = base_score(elements_completed, elapsed_secs);
        let mut total =
            self.base_score as i64 + self.bonus_points as i64 - self.penalty_points as i64;

        if total_mistakes == 0 && elements_completed > 0 {
            total += PERFECT_BONUS as i64;
            self.bonus_points += PERFECT_BONUS;
        }
        if elements_completed as usize == ELEMENT_COUNT && elapsed_secs < SPEED_BONUS_LIMIT_SECS
        {
            total += SPEED_BONUS as i64;
            self.bonus_points += SPEED_BONUS;
        }

        self.score = total.clamp(0, u32::MAX as i64) as u32;
        self.score
    }

    pub fn rank(&self) -> Rank {
        Rank::for_score(self.score)
    }
}

// --- Ranks ------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    #[default]
    Novice,
    Apprentice,
    Chemist,
    Expert,
    Master,
    #[serde(rename = "Grand Master")]
    GrandMaster,
    Legendary,
}

impl Rank {
    pub const ALL: [Rank; 7] = [
        Rank::Novice,
        Rank::Apprentice,
        Rank::Chemist,
        Rank::Expert,
        Rank::Master,
        Rank::GrandMaster,
        Rank::Legendary,
    ];

    /// Inclusive lower bound of the tier.
    pub const fn min_score(self) -> u32 {
        match self {
            Rank::Novice => 0,
            Rank::Apprentice => 10_001,
            Rank::Chemist => 25_001,
            Rank::Expert => 50_001,
            Rank::Master => 75_001,
            Rank::GrandMaster => 100_001,
            Rank::Legendary => 150_001,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::Novice => "Novice",
            Rank::Apprentice => "Apprentice",
            Rank::Chemist => "Chemist",
            Rank::Expert => "Expert",
            Rank::Master => "Master",
            Rank::GrandMaster => "Grand Master",
            Rank::Legendary => "Legendary",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Rank::Novice => "#94a3b8",
            Rank::Apprentice => "#06b6d4",
            Rank::Chemist => "#3b82f6",
            Rank::Expert => "#8b5cf6",
            Rank::Master => "#f59e0b",
            Rank::GrandMaster => "#ef4444",
            Rank::Legendary => "#10b981",
        }
    }

    pub fn for_score(score: u32) -> Rank {
        Rank::ALL
            .iter()
            .rev()
            .copied()
            .find(|r| score >= r.min_score())
            .unwrap_or(Rank::Novice)
    }

    pub fn next(self) -> Option<Rank> {
        Rank::ALL.get(self as usize + 1).copied()
    }
}

/// Percentage of the way from the current tier's floor to the next tier's.
pub fn rank_progress_percent(score: u32) -> u32 {
    let rank = Rank::for_score(score);
    match rank.next() {
        None => 100,
        Some(next) => {
            let span = (next.min_score() - rank.min_score()) as f64;
            ((score - rank.min_score()) as f64 / span * 100.0).round() as u32
        }
    }
}

/// Points still missing for the next tier; `None` at the top.
pub fn points_to_next_rank(score: u32) -> Option<u32> {
    Rank::for_score(score)
        .next()
        .map(|next| next.min_score().saturating_sub(score))
}

/// `MM:SS` clock display.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// --- Records ----------------------------------------------------------------------

/// Immutable result of one finished run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub score: u32,
    // legacy history rows carry no rank
    #[serde(default)]
    pub rank: Rank,
    #[serde(alias = "elementsCount")]
    pub elements_completed: u32,
    #[serde(alias = "time")]
    pub elapsed_seconds: u32,
    #[serde(alias = "wrongAttempts")]
    pub mistakes: u32,
    #[serde(alias = "accuracy")]
    pub accuracy_percent: u32,
    #[serde(default)]
    pub max_streak: u32,
    /// Milliseconds since the Unix epoch.
    #[serde(alias = "date")]
    pub timestamp: u64,
}

/// History rows additionally remember which mode produced them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default = "default_mode_label")]
    pub mode: String,
    #[serde(flatten)]
    pub record: RunRecord,
}

fn default_mode_label() -> String {
    crate::run::GameMode::Classic.history_label().to_string()
}

/// Inserts, re-sorts by score descending, and evicts the lowest past the cap.
pub fn insert_leaderboard(board: &mut Vec<RunRecord>, record: RunRecord) {
    board.push(record);
    // stable: equal scores keep insertion order
    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(LEADERBOARD_CAP);
}

/// Newest first; the oldest rows fall off past the cap.
pub fn insert_history(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.insert(0, entry);
    history.truncate(HISTORY_CAP);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: u32) -> RunRecord {
        RunRecord {
            score,
            rank: Rank::for_score(score),
            elements_completed: 10,
            elapsed_seconds: 60,
            mistakes: 0,
            accuracy_percent: 100,
            max_streak: 10,
            timestamp: score as u64,
        }
    }

    #[test]
    fn escalating_mistake_penalties() {
        let mut s = ScoreState::default();
        s.score = 1000;
        assert_eq!(s.add_mistake(1), 50);
        assert_eq!(s.add_mistake(2), 100);
        assert_eq!(s.add_mistake(3), 200);
        assert_eq!(s.add_mistake(7), 200);
        assert_eq!(s.penalty_points, 550);
        assert_eq!(s.score, 450);
    }

    #[test]
    fn live_score_never_goes_negative() {
        let mut s = ScoreState::default();
        s.add_mistake(3);
        s.add_hint(HintSize::Large);
        assert_eq!(s.score, 0);
        assert_eq!(s.penalty_points, 350);
        assert_eq!(s.hints_used, 1);
    }

    #[test]
    fn streak_bonus_starts_at_two_and_caps_at_ten() {
        let mut s = ScoreState::default();
        assert_eq!(s.add_correct(true, 1), 50);
        assert_eq!(s.add_correct(true, 2), 70);
        assert_eq!(s.add_correct(false, 3), 30);
        assert_eq!(s.add_correct(false, 10), 100);
        assert_eq!(s.add_correct(false, 40), 100);
        assert_eq!(s.first_try_count, 2);
        assert_eq!(s.bonus_points, 350);
    }

    #[test]
    fn base_score_is_guarded_against_zero_time() {
        assert_eq!(base_score(10, 0), 0);
        assert_eq!(base_score(118, 250), 472);
    }

    #[test]
    fn finalize_rebuilds_from_sums() {
        let mut s = ScoreState::default();
        s.add_correct(true, 1);
        s.add_mistake(1);
        // live score: 50 - 50 = 0, but finalize rebuilds from the sums
        let score = s.finalize(1, 10, 1);
        assert_eq!(s.base_score, 100);
        assert_eq!(score, 100);
    }

    #[test]
    fn finalize_adds_perfect_and_speed_bonus() {
        let mut s = ScoreState::default();
        let score = s.finalize(118, 250, 0);
        assert_eq!(score, 472 + PERFECT_BONUS + SPEED_BONUS);
        assert_eq!(s.bonus_points, PERFECT_BONUS + SPEED_BONUS);
    }

    #[test]
    fn finalize_clamps_at_zero() {
        let mut s = ScoreState::default();
        s.add_mistake(3);
        s.add_mistake(3);
        assert_eq!(s.finalize(1, 100, 2), 0);
    }

    #[test]
    fn no_perfect_bonus_without_progress() {
        let mut s = ScoreState::default();
        assert_eq!(s.finalize(0, 30, 0), 0);
    }

    #[test]
    fn rank_boundaries_are_inclusive_on_the_upper_tier() {
        assert_eq!(Rank::for_score(0), Rank::Novice);
        assert_eq!(Rank::for_score(10_000), Rank::Novice);
        assert_eq!(Rank::for_score(10_001), Rank::Apprentice);
        assert_eq!(Rank::for_score(150_000), Rank::GrandMaster);
        assert_eq!(Rank::for_score(150_001), Rank::Legendary);
        assert_eq!(Rank::Legendary.next(), None);
    }

    #[test]
    fn rank_progress() {
        assert_eq!(rank_progress_percent(5_000), 50);
        assert_eq!(rank_progress_percent(200_000), 100);
        assert_eq!(points_to_next_rank(10_000), Some(1));
        assert_eq!(points_to_next_rank(150_001), None);
    }

    #[test]
    fn leaderboard_keeps_top_hundred() {
        let mut board = Vec::new();
        for score in 1..=105 {
            insert_leaderboard(&mut board, record(score));
        }
        assert_eq!(board.len(), LEADERBOARD_CAP);
        assert_eq!(board.first().map(|r| r.score), Some(105));
        assert_eq!(board.last().map(|r| r.score), Some(6));
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut history = Vec::new();
        for score in 0..60 {
            let entry = HistoryEntry {
                mode: "Full Table".into(),
                record: record(score),
            };
            insert_history(&mut history, entry);
        }
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].record.score, 59);
        assert_eq!(history[HISTORY_CAP - 1].record.score, 10);
    }

    #[test]
    fn records_accept_legacy_field_names() {
        let raw = r#"{"score":1200,"rank":"Novice","elementsCount":20,"time":95,
            "mistakes":3,"accuracy":87,"maxStreak":9,"date":1700000000000}"#;
        let rec: RunRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.elements_completed, 20);
        assert_eq!(rec.elapsed_seconds, 95);
        assert_eq!(rec.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn rank_serializes_with_display_name() {
        let json = serde_json::to_string(&Rank::GrandMaster).unwrap();
        assert_eq!(json, "\"Grand Master\"");
        assert_eq!(format_time(125), "02:05");
    }
}
