//! Achievement catalog and evaluation.
//!
//! Definitions are plain data: each carries a `Criterion` that a single
//! interpreter checks against a `RunStats` snapshot. Unlock state is kept
//! separately in an `AchievementBook` and only ever moves from locked to
//! unlocked.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ELEMENT_COUNT;

const FULL_TABLE: u32 = ELEMENT_COUNT as u32;

/// Snapshot handed to the evaluator after every judged answer and at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub correct_count: u32,
    pub total_mistakes: u32,
    pub elapsed_seconds: u32,
    pub score: u32,
    pub max_streak: u32,
    pub is_run_complete: bool,
    pub total_runs_completed: u32,
}

impl RunStats {
    fn finished_full_table(&self) -> bool {
        self.is_run_complete && self.correct_count == FULL_TABLE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    CorrectAtLeast(u32),
    FullTable,
    FullTableFlawless,
    FullTableUnderSecs(u32),
    /// Average seconds per element over a full table, strictly below the bound.
    FullTablePaceUnderSecs(u32),
    StreakAtLeast(u32),
    ScoreAtLeast(u32),
    ScoreDespiteMistakes { score: u32, mistakes: u32 },
    RunsCompletedAtLeast(u32),
}

impl Criterion {
    pub fn is_met(self, stats: &RunStats) -> bool {
        match self {
            Criterion::CorrectAtLeast(n) => stats.correct_count >= n,
            Criterion::FullTable => stats.finished_full_table(),
            Criterion::FullTableFlawless => {
                stats.finished_full_table() && stats.total_mistakes == 0
            }
            Criterion::FullTableUnderSecs(secs) => {
                stats.finished_full_table() && stats.elapsed_seconds < secs
            }
            Criterion::FullTablePaceUnderSecs(secs) => {
                stats.finished_full_table()
                    && (stats.elapsed_seconds as f64 / FULL_TABLE as f64) < secs as f64
            }
            Criterion::StreakAtLeast(n) => stats.max_streak >= n,
            Criterion::ScoreAtLeast(n) => stats.score >= n,
            Criterion::ScoreDespiteMistakes { score, mistakes } => {
                stats.score >= score && stats.total_mistakes >= mistakes
            }
            Criterion::RunsCompletedAtLeast(n) => stats.total_runs_completed >= n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub criterion: Criterion,
}

const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    criterion: Criterion,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        title,
        description,
        criterion,
    }
}

pub static ACHIEVEMENTS: [AchievementDefinition; 16] = [
    def("first_element", "First Step", "Correctly identify your first element", Criterion::CorrectAtLeast(1)),
    def("ten_elements", "Getting Started", "Correctly identify 10 elements in a single run", Criterion::CorrectAtLeast(10)),
    def("fifty_elements", "Half Way There", "Correctly identify 50 elements in a single run", Criterion::CorrectAtLeast(50)),
    def("complete_table", "Full Table", "Complete all 118 elements", Criterion::FullTable),
    def("perfect_run", "Perfectionist", "Complete all 118 elements with zero mistakes", Criterion::FullTableFlawless),
    def("speed_demon", "Speed Demon", "Complete all 118 elements in under 5 minutes", Criterion::FullTableUnderSecs(300)),
    def("streak_10", "10x Streak", "Get 10 correct answers in a row", Criterion::StreakAtLeast(10)),
    def("streak_25", "25x Streak Master", "Get 25 correct answers in a row", Criterion::StreakAtLeast(25)),
    def("streak_all", "Flawless Run", "Get all 118 correct in a row without breaking your streak", Criterion::StreakAtLeast(FULL_TABLE)),
    def("first_milestone", "First Milestone", "Reach 10,000 points", Criterion::ScoreAtLeast(10_000)),
    def("half_century", "Half Century", "Reach 50,000 points", Criterion::ScoreAtLeast(50_000)),
    def("centurion", "Centurion", "Reach 100,000 points", Criterion::ScoreAtLeast(100_000)),
    def("five_challenges", "Dedicated", "Complete 5 challenges", Criterion::RunsCompletedAtLeast(5)),
    def("twenty_challenges", "Veteran", "Complete 20 challenges", Criterion::RunsCompletedAtLeast(20)),
    def("fast_learner", "Fast Learner", "Average under 3 seconds per element across all 118", Criterion::FullTablePaceUnderSecs(3)),
    def("comeback_kid", "Comeback Kid", "Score 50,000+ despite making 5 or more mistakes", Criterion::ScoreDespiteMistakes { score: 50_000, mistakes: 5 }),
];

pub fn definition(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Definitions whose criterion is met and that are not in `prior_unlocks`.
/// Already-unlocked ids are skipped before their criterion is looked at.
pub fn evaluate(
    stats: &RunStats,
    prior_unlocks: &BTreeSet<&str>,
) -> Vec<&'static AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !prior_unlocks.contains(a.id))
        .filter(|a| a.criterion.is_met(stats))
        .collect()
}

// --- Persisted unlock state -----------------------------------------------------

/// Wire shape under the `achievements` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    pub id: String,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AchievementBook {
    // id -> unlock timestamp (ms since epoch)
    unlocked: BTreeMap<&'static str, Option<u64>>,
}

impl AchievementBook {
    /// Rebuilds from stored records; unknown ids and locked rows are dropped.
    pub fn from_records(records: &[UnlockRecord]) -> Self {
        let unlocked = records
            .iter()
            .filter(|r| r.unlocked)
            .filter_map(|r| definition(&r.id).map(|d| (d.id, r.unlocked_at)))
            .collect();
        Self { unlocked }
    }

    /// One row per definition, in catalog order.
    pub fn to_records(&self) -> Vec<UnlockRecord> {
        ACHIEVEMENTS
            .iter()
            .map(|a| {
                let at = self.unlocked.get(a.id).copied();
                UnlockRecord {
                    id: a.id.to_string(),
                    unlocked: at.is_some(),
                    unlocked_at: at.flatten(),
                }
            })
            .collect()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    pub fn unlocked_at(&self, id: &str) -> Option<u64> {
        self.unlocked.get(id).copied().flatten()
    }

    pub fn unlocked_ids(&self) -> BTreeSet<&'static str> {
        self.unlocked.keys().copied().collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn total_count(&self) -> usize {
        ACHIEVEMENTS.len()
    }

    /// Evaluates and marks every newly met definition as unlocked at `now_ms`.
    pub fn unlock_new(
        &mut self,
        stats: &RunStats,
        now_ms: u64,
    ) -> Vec<&'static AchievementDefinition> {
        let fresh = evaluate(stats, &self.unlocked_ids());
        for achievement in &fresh {
            log::info!("achievement unlocked: {}", achievement.id);
            self.unlocked.insert(achievement.id, Some(now_ms));
        }
        fresh
    }
}
