//! Match detector - flood-fill connected component search
//!
//! A match is a maximal connected component of same-rank tiles with at least
//! `min_size` members. One full-board pass visits every occupied cell at most
//! once, so groups never overlap or double-count - the visited-set invariant
//! the merge resolver relies on.

use std::collections::{HashSet, VecDeque};

use crate::core::axial::AxialCoord;
use crate::core::board::Board;
use crate::types::Rank;

/// One qualifying match: a connected same-rank component.
///
/// `members[0]` is the flood-fill seed (first member in board scan order) and
/// is the tile that survives the merge. `center` is the rounded centroid of
/// the members, snapped to the nearest member whenever rounding lands on a
/// cell outside the group (concave shapes), so it always names a real tile;
/// area effects and presentation anchor on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub rank: Rank,
    pub members: Vec<AxialCoord>,
    pub center: AxialCoord,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Find all qualifying matches on the board in one pass.
///
/// Every maximal connected same-rank component of size >= `min_size` is
/// returned exactly once; no tile belongs to two groups. Positions consumed
/// by an accepted group never seed a second search. O(N) in occupied cells.
pub fn find_all_matches(board: &Board, min_size: usize) -> Vec<MatchGroup> {
    let mut visited: HashSet<AxialCoord> = HashSet::new();
    let mut groups = Vec::new();

    for pos in board.tile_positions() {
        if visited.contains(&pos) {
            continue;
        }
        let members = flood_fill(board, pos, &mut visited);
        if members.len() >= min_size {
            let rank = board.get(pos).expect("flood fill seeded at occupied cell");
            let center = centroid(&members);
            groups.push(MatchGroup {
                rank,
                members,
                center,
            });
        }
    }

    groups
}

/// Find the match containing `origin`, if one qualifies.
pub fn find_matches_from(board: &Board, origin: AxialCoord, min_size: usize) -> Option<MatchGroup> {
    let rank = board.get(origin)?;
    let mut visited = HashSet::new();
    let members = flood_fill(board, origin, &mut visited);
    if members.len() >= min_size {
        let center = centroid(&members);
        Some(MatchGroup {
            rank,
            members,
            center,
        })
    } else {
        None
    }
}

/// Cheap playability check: does any tile have enough same-rank neighbors to
/// imply a reachable match?
///
/// Counts same-rank occupied neighbors per tile and reports true when any
/// tile reaches `min_size - 1`. For `min_size == 3` this is exact in both
/// directions: any connected component of 3+ tiles contains a tile of degree
/// 2+, and a tile with 2 same-rank neighbors sits in a component of 3+. For
/// larger minimum sizes it is only a necessary-condition approximation (it
/// does not prove a large component exists across multiple hops); the
/// flood-fill scan is ground truth.
pub fn has_possible_matches(board: &Board, min_size: usize) -> bool {
    let needed = min_size.saturating_sub(1);
    for (pos, rank) in board.tiles() {
        let same = pos
            .neighbors()
            .iter()
            .filter(|n| board.get(**n) == Some(rank))
            .count();
        if same >= needed {
            return true;
        }
    }
    false
}

/// BFS over same-rank neighbors starting at `seed`. Members are returned in
/// visit order with the seed first; all of them are added to `visited`.
fn flood_fill(board: &Board, seed: AxialCoord, visited: &mut HashSet<AxialCoord>) -> Vec<AxialCoord> {
    let Some(rank) = board.get(seed) else {
        return Vec::new();
    };

    let mut members = vec![seed];
    let mut queue = VecDeque::from([seed]);
    visited.insert(seed);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if visited.contains(&neighbor) {
                continue;
            }
            if board.get(neighbor) == Some(rank) {
                visited.insert(neighbor);
                members.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    members
}

/// Rounded centroid of the member positions, snapped to the nearest member
/// when the rounded cell is not itself part of the group (concave shapes).
fn centroid(members: &[AxialCoord]) -> AxialCoord {
    debug_assert!(!members.is_empty(), "match groups are never empty");

    let n = members.len() as f32;
    let qf = members.iter().map(|p| p.q as f32).sum::<f32>() / n;
    let rf = members.iter().map(|p| p.r as f32).sum::<f32>() / n;
    let rounded = AxialCoord::round(qf, rf);

    if members.contains(&rounded) {
        return rounded;
    }
    // First member at minimal distance wins, keeping the choice deterministic.
    *members
        .iter()
        .min_by_key(|p| p.distance(&rounded))
        .expect("non-empty members")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(tiles: &[(i32, i32, Rank)]) -> Board {
        let mut board = Board::new(3);
        for &(q, r, rank) in tiles {
            assert!(board.set(AxialCoord::new(q, r), Some(rank)));
        }
        board
    }

    #[test]
    fn test_no_matches_on_empty_board() {
        let board = Board::new(2);
        assert!(find_all_matches(&board, 3).is_empty());
        assert!(!has_possible_matches(&board, 3));
    }

    #[test]
    fn test_pair_does_not_qualify() {
        let board = board_with(&[(0, 0, Rank::Iron), (1, 0, Rank::Iron)]);
        assert!(find_all_matches(&board, 3).is_empty());
        assert!(!has_possible_matches(&board, 3));
    }

    #[test]
    fn test_l_shaped_triple() {
        // (0,0) - (1,0) east, then (1,-1) northeast of (0,0): an L.
        let board = board_with(&[
            (0, 0, Rank::Iron),
            (1, 0, Rank::Iron),
            (1, -1, Rank::Iron),
        ]);

        let groups = find_all_matches(&board, 3);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.rank, Rank::Iron);
        assert_eq!(group.len(), 3);
        // Centroid (2/3, -1/3) rounds to a member of the group.
        assert!(group.members.contains(&group.center));
        assert!(has_possible_matches(&board, 3));
    }

    #[test]
    fn test_seed_is_first_member_in_scan_order() {
        let board = board_with(&[
            (0, 0, Rank::Silver),
            (1, 0, Rank::Silver),
            (0, 1, Rank::Silver),
        ]);
        let groups = find_all_matches(&board, 3);
        // Scan order is sorted (q, r): (0,0) seeds the group.
        assert_eq!(groups[0].members[0], AxialCoord::new(0, 0));
    }

    #[test]
    fn test_mixed_ranks_do_not_connect() {
        let board = board_with(&[
            (0, 0, Rank::Iron),
            (1, 0, Rank::Silver),
            (2, 0, Rank::Iron),
            (0, 1, Rank::Iron),
        ]);
        // Iron tiles at (0,0) and (0,1) touch, but (2,0) is cut off by Silver.
        assert!(find_all_matches(&board, 3).is_empty());
    }

    #[test]
    fn test_two_separate_components_no_overlap() {
        let board = board_with(&[
            // Component A around the west side.
            (-2, 0, Rank::Gold),
            (-1, 0, Rank::Gold),
            (-1, -1, Rank::Gold),
            // Component B on the east side, same rank, not adjacent to A.
            (1, 0, Rank::Gold),
            (2, 0, Rank::Gold),
            (2, -1, Rank::Gold),
        ]);

        let groups = find_all_matches(&board, 3);
        assert_eq!(groups.len(), 2);

        let mut seen = HashSet::new();
        for group in &groups {
            for member in &group.members {
                assert!(seen.insert(*member), "tile {member:?} in two groups");
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_large_component_counted_once() {
        // A 7-tile blob: center plus all 6 neighbors.
        let mut tiles = vec![(0, 0, Rank::Iron)];
        for n in AxialCoord::new(0, 0).neighbors() {
            tiles.push((n.q, n.r, Rank::Iron));
        }
        let board = board_with(&tiles);

        let groups = find_all_matches(&board, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 7);
        assert_eq!(groups[0].center, AxialCoord::new(0, 0));
    }

    #[test]
    fn test_concave_group_center_is_a_member() {
        // Arc around the origin: the raw centroid rounds to (0,0), which is
        // the empty cell inside the arc, so the center snaps to a member.
        let board = board_with(&[
            (-1, 0, Rank::Iron),
            (0, -1, Rank::Iron),
            (1, -1, Rank::Iron),
            (1, 0, Rank::Iron),
        ]);

        let groups = find_all_matches(&board, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(board.get(AxialCoord::new(0, 0)), None);
        assert!(groups[0].members.contains(&groups[0].center));
    }

    #[test]
    fn test_find_matches_from_origin() {
        let board = board_with(&[
            (0, 0, Rank::Iron),
            (1, 0, Rank::Iron),
            (2, 0, Rank::Iron),
        ]);

        let group = find_matches_from(&board, AxialCoord::new(2, 0), 3).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.members[0], AxialCoord::new(2, 0));

        assert!(find_matches_from(&board, AxialCoord::new(0, 1), 3).is_none());
    }

    #[test]
    fn test_heuristic_agrees_with_flood_fill_at_min_size_3() {
        // Line of three: only the middle tile has 2 same-rank neighbors.
        let line = board_with(&[
            (-1, 0, Rank::Iron),
            (0, 0, Rank::Iron),
            (1, 0, Rank::Iron),
        ]);
        assert!(has_possible_matches(&line, 3));
        assert_eq!(find_all_matches(&line, 3).len(), 1);

        // Two disjoint pairs: heuristic and flood fill both say no.
        let pairs = board_with(&[
            (-2, 0, Rank::Iron),
            (-1, 0, Rank::Iron),
            (1, 0, Rank::Iron),
            (2, 0, Rank::Iron),
        ]);
        assert!(!has_possible_matches(&pairs, 3));
        assert!(find_all_matches(&pairs, 3).is_empty());
    }

    #[test]
    fn test_min_size_respected() {
        let board = board_with(&[
            (0, 0, Rank::Iron),
            (1, 0, Rank::Iron),
            (2, 0, Rank::Iron),
        ]);
        assert_eq!(find_all_matches(&board, 3).len(), 1);
        assert!(find_all_matches(&board, 4).is_empty());
    }
}
