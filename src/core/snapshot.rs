//! Session snapshot - the serializable observation surface
//!
//! Presentation and persistence collaborators consume engine state through
//! this structure instead of reaching into the board. Serde derives keep it
//! transport-agnostic.

use serde::{Deserialize, Serialize};

use crate::core::rules::LevelOutcome;
use crate::core::session::GameSession;
use crate::types::Rank;

/// One placed tile as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub q: i32,
    pub r: i32,
    pub rank: Rank,
}

/// Read-only snapshot of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub episode_id: u32,
    pub seed: u32,
    pub started: bool,
    pub score: u32,
    pub energy: u32,
    pub merges: u32,
    pub moves_used: u32,
    pub time_remaining_ms: Option<u32>,
    pub combo_count: u32,
    pub in_combo_phase: bool,
    pub outcome: LevelOutcome,
    /// Placed tiles, sorted by position for stable output
    pub tiles: Vec<TileSnapshot>,
    /// Blocked cells as (q, r), sorted
    pub blocked: Vec<(i32, i32)>,
}

impl SessionSnapshot {
    /// Capture the current state of a session
    pub fn capture(session: &GameSession) -> Self {
        let tiles = session
            .board()
            .tiles()
            .into_iter()
            .map(|(pos, rank)| TileSnapshot {
                q: pos.q,
                r: pos.r,
                rank,
            })
            .collect();

        let mut blocked: Vec<(i32, i32)> = session
            .board()
            .positions()
            .filter(|pos| session.board().is_blocked(*pos))
            .map(|pos| (pos.q, pos.r))
            .collect();
        blocked.sort_unstable();

        let combo = session.combo();
        Self {
            episode_id: session.episode_id(),
            seed: session.seed(),
            started: session.started(),
            score: session.score(),
            energy: session.energy(),
            merges: session.merges(),
            moves_used: session.moves_used(),
            time_remaining_ms: session.time_remaining_ms(),
            combo_count: combo.combo_count,
            in_combo_phase: combo.in_combo_phase,
            outcome: session.outcome(),
            tiles,
            blocked,
        }
    }
}
