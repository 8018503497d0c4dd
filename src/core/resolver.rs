//! Merge resolver - applies one qualifying match to the board
//!
//! Removes all but the surviving tile, upgrades the survivor (or fires the
//! terminal "divine" merge at top rank), applies the rank-specific side
//! effect clears, and reports score and energy deltas. The resolver never
//! decides whether to cascade; that is the session's job.

use arrayvec::ArrayVec;

use crate::core::axial::AxialCoord;
use crate::core::board::Board;
use crate::core::matching::MatchGroup;
use crate::core::scoring::{calculate_match_score, energy_gain};
use crate::types::{
    Rank, AREA_CLEAR_BONUS, DIVINE_CLEAR_RADIUS, DIVINE_MERGE_BONUS, ROW_CLEAR_BONUS,
};

/// Outcome of resolving one match group
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MergeResult {
    /// Rank of the merged group
    pub rank: Rank,
    /// Tile that survived the merge
    pub survivor: AxialCoord,
    /// Survivor's rank after the merge; `None` on a terminal merge
    pub new_rank: Option<Rank>,
    /// Group members removed by the merge itself (k - 1 tiles)
    pub removed: Vec<AxialCoord>,
    /// Extra tiles removed by the rank-specific side effect
    pub side_effect_clears: Vec<AxialCoord>,
    /// True when top-rank tiles merged (the "divine merge" path)
    pub terminal_signal: bool,
    pub score_delta: u32,
    pub energy_delta: u32,
}

/// Resolve one qualifying match group against the board.
///
/// `combo_count` is the cascade counter after incrementing for this merge; it
/// feeds the combo multiplier. The detector guarantees non-empty groups whose
/// members all hold `group.rank`; violations are programming errors.
pub fn resolve_merge(board: &mut Board, group: &MatchGroup, combo_count: u32) -> MergeResult {
    debug_assert!(!group.is_empty(), "match detector never emits empty groups");
    debug_assert!(
        group
            .members
            .iter()
            .all(|pos| board.get(*pos) == Some(group.rank)),
        "match group out of sync with board"
    );

    let survivor = group.members[0];
    let mut removed = Vec::with_capacity(group.len() - 1);
    for pos in &group.members[1..] {
        board.remove(*pos);
        removed.push(*pos);
    }

    let mut score = calculate_match_score(group.rank, group.len(), combo_count);
    let energy = energy_gain(group.rank, group.len());

    let new_rank = group.rank.next();
    let mut side_effect_clears = Vec::new();
    let mut terminal_signal = false;

    match new_rank {
        Some(upgraded) => {
            board.set(survivor, Some(upgraded));
            match group.rank {
                // Directional: clear everything sharing the survivor's row.
                Rank::Silver => {
                    for (pos, _) in board.tiles() {
                        if pos.r == survivor.r && pos != survivor {
                            board.remove(pos);
                            side_effect_clears.push(pos);
                            score += ROW_CLEAR_BONUS;
                        }
                    }
                }
                // Area: clear the survivor's occupied neighbors.
                Rank::Gold => {
                    let targets: ArrayVec<AxialCoord, 6> = survivor
                        .neighbors()
                        .into_iter()
                        .filter(|pos| board.get(*pos).is_some())
                        .collect();
                    for pos in targets {
                        board.remove(pos);
                        side_effect_clears.push(pos);
                        score += AREA_CLEAR_BONUS;
                    }
                }
                _ => {}
            }
        }
        None => {
            // Terminal merge: the survivor stays at top rank, a wide clear
            // fires around the group center, and the flat bonus applies.
            terminal_signal = true;
            score += DIVINE_MERGE_BONUS;
            for pos in group.center.within_range(DIVINE_CLEAR_RADIUS) {
                if pos != survivor && board.get(pos).is_some() {
                    board.remove(pos);
                    side_effect_clears.push(pos);
                }
            }
        }
    }

    MergeResult {
        rank: group.rank,
        survivor,
        new_rank,
        removed,
        side_effect_clears,
        terminal_signal,
        score_delta: score,
        energy_delta: energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matching::find_all_matches;
    use crate::types::RANK_BASE_VALUES;

    fn board_with(tiles: &[(i32, i32, Rank)]) -> Board {
        let mut board = Board::new(3);
        for &(q, r, rank) in tiles {
            assert!(board.set(AxialCoord::new(q, r), Some(rank)));
        }
        board
    }

    #[test]
    fn test_basic_merge_conservation() {
        let mut board = board_with(&[
            (0, 0, Rank::Iron),
            (1, 0, Rank::Iron),
            (2, 0, Rank::Iron),
        ]);
        let group = find_all_matches(&board, 3).remove(0);

        let result = resolve_merge(&mut board, &group, 1);

        // k tiles in, k-1 removed, one upgraded.
        assert_eq!(result.removed.len(), 2);
        assert_eq!(board.tile_count(), 1);
        assert_eq!(result.survivor, AxialCoord::new(0, 0));
        assert_eq!(result.new_rank, Some(Rank::Silver));
        assert_eq!(board.get(result.survivor), Some(Rank::Silver));
        assert!(!result.terminal_signal);
        assert!(result.side_effect_clears.is_empty());
        assert_eq!(result.score_delta, RANK_BASE_VALUES[0] * 3);
        assert_eq!(result.energy_delta, Rank::Iron.energy_value());
    }

    #[test]
    fn test_silver_merge_clears_row() {
        // Five connected Silver tiles along r = 0, plus two bystanders on the
        // same row and one off-row tile that must survive.
        let mut board = board_with(&[
            (-1, 0, Rank::Silver),
            (0, 0, Rank::Silver),
            (1, 0, Rank::Silver),
            (2, 0, Rank::Silver),
            (3, 0, Rank::Silver),
            (-3, 0, Rank::Iron),
            (-2, 0, Rank::Gold),
            (0, 1, Rank::Iron),
        ]);
        let group = find_all_matches(&board, 3).remove(0);
        assert_eq!(group.len(), 5);

        let result = resolve_merge(&mut board, &group, 1);

        assert_eq!(result.new_rank, Some(Rank::Gold));
        // Both row bystanders cleared, each with the fixed bonus.
        assert_eq!(result.side_effect_clears.len(), 2);
        assert!(result.side_effect_clears.contains(&AxialCoord::new(-3, 0)));
        assert!(result.side_effect_clears.contains(&AxialCoord::new(-2, 0)));
        assert_eq!(
            result.score_delta,
            RANK_BASE_VALUES[1] * 5 + 2 * ROW_CLEAR_BONUS
        );
        // Off-row tile untouched.
        assert_eq!(board.get(AxialCoord::new(0, 1)), Some(Rank::Iron));
        assert_eq!(board.tile_count(), 2);
    }

    #[test]
    fn test_gold_merge_clears_neighbors() {
        let mut board = board_with(&[
            (0, 0, Rank::Gold),
            (1, 0, Rank::Gold),
            (2, 0, Rank::Gold),
            // Neighbors of the survivor (0,0).
            (0, 1, Rank::Iron),
            (-1, 0, Rank::Silver),
            // Not adjacent to the survivor.
            (2, -2, Rank::Iron),
        ]);
        let group = find_all_matches(&board, 3).remove(0);
        assert_eq!(group.members[0], AxialCoord::new(0, 0));

        let result = resolve_merge(&mut board, &group, 1);

        assert_eq!(result.new_rank, Some(Rank::Divine));
        assert_eq!(result.side_effect_clears.len(), 2);
        assert_eq!(
            result.score_delta,
            RANK_BASE_VALUES[2] * 3 + 2 * AREA_CLEAR_BONUS
        );
        assert_eq!(board.get(AxialCoord::new(2, -2)), Some(Rank::Iron));
        assert_eq!(board.get(AxialCoord::new(0, 0)), Some(Rank::Divine));
    }

    #[test]
    fn test_divine_merge_is_terminal() {
        let mut board = board_with(&[
            (0, 0, Rank::Divine),
            (1, 0, Rank::Divine),
            (0, 1, Rank::Divine),
            // Within the wide clear radius of the center.
            (2, 0, Rank::Iron),
            // Outside it.
            (3, -3, Rank::Iron),
        ]);
        let group = find_all_matches(&board, 3).remove(0);

        let result = resolve_merge(&mut board, &group, 1);

        assert!(result.terminal_signal);
        assert_eq!(result.new_rank, None);
        // Survivor keeps its rank; the merge is not a silent no-op.
        assert_eq!(board.get(result.survivor), Some(Rank::Divine));
        assert!(result.side_effect_clears.contains(&AxialCoord::new(2, 0)));
        assert_eq!(board.get(AxialCoord::new(3, -3)), Some(Rank::Iron));
        assert_eq!(
            result.score_delta,
            RANK_BASE_VALUES[3] * 3 + DIVINE_MERGE_BONUS
        );
    }

    #[test]
    fn test_combo_multiplier_applied() {
        let make = |combo| {
            let mut board = board_with(&[
                (0, 0, Rank::Iron),
                (1, 0, Rank::Iron),
                (2, 0, Rank::Iron),
            ]);
            let group = find_all_matches(&board, 3).remove(0);
            resolve_merge(&mut board, &group, combo).score_delta
        };
        let first = make(1);
        let second = make(2);
        assert_eq!(second, first * 120 / 100);
    }
}
