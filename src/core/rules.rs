//! Level rules - per-level configuration and outcome evaluation
//!
//! `LevelRules` is built by the level-content layer and stays immutable for
//! the whole attempt. Outcome evaluation is a pure threshold check over the
//! counters the session maintains.

use serde::{Deserialize, Serialize};

use crate::core::scoring::StarThresholds;
use crate::types::{Rank, DEFAULT_BOARD_RADIUS, DEFAULT_MIN_MATCH_SIZE};

/// Immutable rules for one level attempt
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRules {
    pub board_radius: i32,
    pub min_match_size: usize,
    /// Wall-clock budget; `None` means untimed
    pub time_limit_ms: Option<u32>,
    /// Move budget; `None` means unlimited moves
    pub move_limit: Option<u32>,
    /// Cells blocked at session start
    pub blocked_cell_count: usize,
    /// Periodic forced reshuffle; `None` disables it
    pub shuffle_interval_ms: Option<u32>,
    /// Weighted rank table for refills (weights need not sum to 100)
    pub spawn_weights: Vec<(Rank, u32)>,
    /// Ranks eligible for the guaranteed opening triple
    pub guaranteed_ranks: Vec<Rank>,
    /// Score required for victory
    pub score_target: u32,
    /// Score treated as a perfect run (3 stars)
    pub perfect_score: u32,
    /// Merges required for victory
    pub merge_target: u32,
    pub star_thresholds: StarThresholds,
    /// Guaranteed-match injections performed by the ultimate skill
    pub ultimate_forced_matches: u32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            board_radius: DEFAULT_BOARD_RADIUS,
            min_match_size: DEFAULT_MIN_MATCH_SIZE,
            time_limit_ms: None,
            move_limit: None,
            blocked_cell_count: 0,
            shuffle_interval_ms: None,
            spawn_weights: vec![(Rank::Iron, 60), (Rank::Silver, 25), (Rank::Gold, 15)],
            guaranteed_ranks: vec![Rank::Iron],
            score_target: 1000,
            perfect_score: 2500,
            merge_target: 5,
            star_thresholds: StarThresholds::default(),
            ultimate_forced_matches: 1,
        }
    }
}

/// Why a level attempt was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    TimeExpired,
    OutOfMoves,
    BoardStuck,
}

/// Result of the game-ending checks after a move or tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    InProgress,
    Victory,
    Defeat(DefeatReason),
}

impl LevelOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, LevelOutcome::InProgress)
    }
}

/// Evaluate the game-ending conditions from rules plus current counters.
///
/// Victory requires both the score and merge targets; checked before the
/// defeat conditions so hitting the target on the final move still wins.
pub fn evaluate_outcome(
    rules: &LevelRules,
    score: u32,
    merges: u32,
    moves_used: u32,
    time_remaining_ms: Option<u32>,
    board_stuck: bool,
) -> LevelOutcome {
    if score >= rules.score_target && merges >= rules.merge_target {
        return LevelOutcome::Victory;
    }
    if board_stuck {
        return LevelOutcome::Defeat(DefeatReason::BoardStuck);
    }
    if rules.time_limit_ms.is_some() && time_remaining_ms == Some(0) {
        return LevelOutcome::Defeat(DefeatReason::TimeExpired);
    }
    if let Some(limit) = rules.move_limit {
        if moves_used >= limit {
            return LevelOutcome::Defeat(DefeatReason::OutOfMoves);
        }
    }
    LevelOutcome::InProgress
}
