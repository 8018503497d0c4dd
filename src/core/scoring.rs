//! Score and energy model - stateless calculators
//!
//! Match scores, the combo multiplier, star ratings, cultivation growth, and
//! energy accrual. Everything here is a pure function of its inputs; the
//! session owns the running totals.

use crate::types::{Rank, COMBO_STEP_PCT, DEFAULT_ONE_STAR_PCT, DEFAULT_TWO_STAR_PCT};

/// Combo multiplier in percent: 100 for the first merge, +20 per combo level
/// after that (1 + 0.2 * (combo - 1)).
pub fn combo_multiplier_pct(combo_count: u32) -> u32 {
    100 + COMBO_STEP_PCT * combo_count.saturating_sub(1)
}

/// Apply the combo multiplier to a base score, rounding to nearest.
pub fn apply_combo(base: u32, combo_count: u32) -> u32 {
    let pct = combo_multiplier_pct(combo_count);
    (base.saturating_mul(pct) + 50) / 100
}

/// Score for merging `count` tiles of `rank` as the `combo_count`-th merge of
/// a cascade (`combo_count` is taken after incrementing for this merge).
pub fn calculate_match_score(rank: Rank, count: usize, combo_count: u32) -> u32 {
    let base = rank.base_value().saturating_mul(count as u32);
    apply_combo(base, combo_count)
}

/// Energy gained by merging `count` tiles of `rank`. The session clamps the
/// running meter to `[0, MAX_ENERGY]`.
pub fn energy_gain(rank: Rank, count: usize) -> u32 {
    rank.energy_value().saturating_mul(count as u32) / 3
}

/// Star rating thresholds, configured per level (percent of the score target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StarThresholds {
    pub two_star_pct: u32,
    pub one_star_pct: u32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            two_star_pct: DEFAULT_TWO_STAR_PCT,
            one_star_pct: DEFAULT_ONE_STAR_PCT,
        }
    }
}

/// Star rating for a finished level: 3 at or above the perfect score, 2 and 1
/// at the configured percentages of the target, 0 below.
pub fn calculate_stars(score: u32, target: u32, perfect: u32, thresholds: &StarThresholds) -> u8 {
    if score >= perfect {
        return 3;
    }
    let target = target.max(1) as u64;
    let score = score as u64;
    if score * 100 >= target * thresholds.two_star_pct as u64 {
        2
    } else if score * 100 >= target * thresholds.one_star_pct as u64 {
        1
    } else {
        0
    }
}

/// Cultivation growth awarded for a finished level attempt.
pub fn calculate_cultivation_growth(level_id: u32, stars: u8, score: u32) -> u32 {
    let star_bonus = 25 * stars as u32;
    let level_base = 5 * (level_id + 1);
    level_base + star_bonus + score / 100
}
