//! Core types shared across the engine
//!
//! Pure data types and tuning constants. Everything here is deterministic
//! and has no dependency on the session state.

use serde::{Deserialize, Serialize};

/// Default board radius (distance from center to edge, inclusive)
pub const DEFAULT_BOARD_RADIUS: i32 = 3;

/// Minimum connected component size that qualifies as a match
pub const DEFAULT_MIN_MATCH_SIZE: usize = 3;

/// Energy meter capacity; the ultimate skill unlocks at this value
pub const MAX_ENERGY: u32 = 100;

/// Base score per tile, indexed by rank
pub const RANK_BASE_VALUES: [u32; 4] = [10, 30, 90, 270];

/// Energy value per tile, indexed by rank
pub const RANK_ENERGY_VALUES: [u32; 4] = [3, 6, 12, 24];

/// Combo multiplier step, in percent per combo level above the first
pub const COMBO_STEP_PCT: u32 = 20;

/// Fixed bonus per tile removed by a row clear (rank-2 merge side effect)
pub const ROW_CLEAR_BONUS: u32 = 5;

/// Fixed bonus per tile removed by an area clear (rank-3 merge side effect)
pub const AREA_CLEAR_BONUS: u32 = 8;

/// Flat bonus awarded by a terminal ("divine") merge of top-rank tiles
pub const DIVINE_MERGE_BONUS: u32 = 500;

/// Radius of the wide clear fired by a terminal merge
pub const DIVINE_CLEAR_RADIUS: i32 = 2;

/// Fill quota for the opening fill of a level
pub const INITIAL_FILL_CAP: usize = 64;

/// Fill quota for mid-level top-ups after merges
pub const TOP_UP_CAP: usize = 12;

/// Maximum forced-reshuffle attempts before the board counts as stuck
pub const RESHUFFLE_ATTEMPTS: u32 = 8;

/// Default star thresholds (percent of the score target)
pub const DEFAULT_TWO_STAR_PCT: u32 = 70;
pub const DEFAULT_ONE_STAR_PCT: u32 = 30;

/// Tile rank. Totally ordered; merging a group upgrades the survivor to the
/// next rank, and merging top-rank tiles fires a terminal "divine" merge
/// instead of upgrading further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Iron,
    Silver,
    Gold,
    Divine,
}

impl Rank {
    /// All ranks, lowest first
    pub const ALL: [Rank; 4] = [Rank::Iron, Rank::Silver, Rank::Gold, Rank::Divine];

    /// Zero-based ordinal used to index the value tables
    pub fn index(self) -> usize {
        match self {
            Rank::Iron => 0,
            Rank::Silver => 1,
            Rank::Gold => 2,
            Rank::Divine => 3,
        }
    }

    /// Next rank up, or `None` at the top (terminal merge territory)
    pub fn next(self) -> Option<Rank> {
        match self {
            Rank::Iron => Some(Rank::Silver),
            Rank::Silver => Some(Rank::Gold),
            Rank::Gold => Some(Rank::Divine),
            Rank::Divine => None,
        }
    }

    /// Base score contributed by one tile of this rank
    pub fn base_value(self) -> u32 {
        RANK_BASE_VALUES[self.index()]
    }

    /// Energy contributed by one tile of this rank
    pub fn energy_value(self) -> u32 {
        RANK_ENERGY_VALUES[self.index()]
    }

    /// Parse rank from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "iron" => Some(Rank::Iron),
            "silver" => Some(Rank::Silver),
            "gold" => Some(Rank::Gold),
            "divine" => Some(Rank::Divine),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Iron => "iron",
            Rank::Silver => "silver",
            Rank::Gold => "gold",
            Rank::Divine => "divine",
        }
    }
}

/// Cell on the board (None = empty, Some = tile of that rank)
pub type Cell = Option<Rank>;
