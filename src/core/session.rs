//! Game session - cascade controller and the engine's public surface
//!
//! One `GameSession` owns the board, RNG, and counters for a single level
//! attempt. Player input arrives as swaps (`attempt_move`); the session runs
//! the merge/refill cascade to a fixed point inside that call, so timers and
//! move counters never observe an intermediate board. Time and moves are only
//! consumed outside the combo phase.

use crate::core::axial::AxialCoord;
use crate::core::board::Board;
use crate::core::matching::{find_all_matches, find_matches_from, has_possible_matches};
use crate::core::refill::{ensure_playable, initial_fill, top_up};
use crate::core::resolver::{resolve_merge, MergeResult};
use crate::core::rng::SimpleRng;
use crate::core::rules::{evaluate_outcome, LevelOutcome, LevelRules};
use crate::error::EngineError;
use crate::types::{Rank, MAX_ENERGY};

/// Cascade state: combo depth and whether resolution is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboState {
    /// Incremented once per resolved match group within one cascading pass
    pub combo_count: u32,
    /// While true, time and move consumption are suspended
    pub in_combo_phase: bool,
}

/// Structured result of one player move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// False when the move was rejected (no board mutation happened)
    pub accepted: bool,
    /// Every merge resolved by the cascade, in resolution order
    pub merge_results: Vec<MergeResult>,
    /// Total score gained by this move's cascade
    pub score_delta: u32,
    /// Combo depth reached before the counter reset
    pub final_combo_count: u32,
    /// Number of scan/resolve/refill rounds the cascade ran
    pub cascade_rounds: u32,
    /// The guarantor had to force tiles into a match
    pub reshuffled: bool,
    /// No legal move exists despite forced reshuffles
    pub board_stuck: bool,
    pub outcome: LevelOutcome,
}

impl MoveResult {
    fn rejected(outcome: LevelOutcome) -> Self {
        Self {
            accepted: false,
            merge_results: Vec::new(),
            score_delta: 0,
            final_combo_count: 0,
            cascade_rounds: 0,
            reshuffled: false,
            board_stuck: false,
            outcome,
        }
    }
}

/// Result of firing the ultimate skill
#[derive(Debug, Clone, PartialEq)]
pub struct UltimateResult {
    /// Forced-match injections that actually ran a cascade
    pub forced_rounds: u32,
    pub merge_results: Vec<MergeResult>,
    pub score_delta: u32,
    pub reshuffled: bool,
    pub board_stuck: bool,
    pub outcome: LevelOutcome,
}

/// What a timer tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: LevelOutcome,
    /// The shuffle interval elapsed and the board was re-rolled
    pub reshuffled: bool,
}

/// One level attempt: board, rules, RNG, and all running counters.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    rules: LevelRules,
    rng: SimpleRng,
    combo: ComboState,
    score: u32,
    energy: u32,
    merges: u32,
    moves_used: u32,
    time_remaining_ms: Option<u32>,
    shuffle_timer_ms: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    seed: u32,
    started: bool,
    board_stuck: bool,
}

impl GameSession {
    /// Create a session from level rules and an RNG seed. The board stays
    /// empty until `start()`.
    pub fn new(rules: LevelRules, seed: u32) -> Self {
        Self {
            board: Board::new(rules.board_radius),
            rng: SimpleRng::new(seed),
            rules,
            combo: ComboState::default(),
            score: 0,
            energy: 0,
            merges: 0,
            moves_used: 0,
            time_remaining_ms: None,
            shuffle_timer_ms: 0,
            episode_id: 0,
            seed,
            started: false,
            board_stuck: false,
        }
    }

    /// Create a session over a prepared board. Used by level tooling and
    /// tests that need exact tile layouts; `start()` must not be called.
    pub fn with_board(rules: LevelRules, seed: u32, board: Board) -> Self {
        let mut session = Self::new(rules, seed);
        session.board = board;
        session.time_remaining_ms = session.rules.time_limit_ms;
        session.started = true;
        session
    }

    /// Start the attempt: block the configured number of cells, run the
    /// opening fill, and arm the timers.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.time_remaining_ms = self.rules.time_limit_ms;
        self.shuffle_timer_ms = 0;

        // Block distinct random valid cells before any tile spawns.
        let mut candidates: Vec<AxialCoord> = self.board.positions().collect();
        self.rng.shuffle(&mut candidates);
        for pos in candidates.into_iter().take(self.rules.blocked_cell_count) {
            self.board.block(pos);
        }

        let report = initial_fill(&mut self.board, &self.rules, &mut self.rng);
        self.board_stuck = report.board_stuck;
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn merges(&self) -> u32 {
        self.merges
    }

    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    pub fn time_remaining_ms(&self) -> Option<u32> {
        self.time_remaining_ms
    }

    pub fn combo(&self) -> ComboState {
        self.combo
    }

    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    // Read-only snapshot queries for presentation collaborators.

    pub fn tile_at(&self, pos: AxialCoord) -> Option<Rank> {
        self.board.get(pos)
    }

    pub fn tile_positions(&self) -> Vec<AxialCoord> {
        self.board.tile_positions()
    }

    pub fn is_blocked(&self, pos: AxialCoord) -> bool {
        self.board.is_blocked(pos)
    }

    /// Current game-ending evaluation
    pub fn outcome(&self) -> LevelOutcome {
        if !self.started {
            return LevelOutcome::InProgress;
        }
        evaluate_outcome(
            &self.rules,
            self.score,
            self.merges,
            self.moves_used,
            self.time_remaining_ms,
            self.board_stuck,
        )
    }

    /// Attempt a player move: swap the occupants of two adjacent cells and
    /// resolve the resulting cascade to a fixed point.
    ///
    /// Rejected (no board mutation) when the session is not accepting input,
    /// either position is invalid or blocked, or the cells are not neighbors.
    /// A swap that produces no match is still accepted and consumes a move.
    pub fn attempt_move(&mut self, from: AxialCoord, to: AxialCoord) -> MoveResult {
        let outcome = self.outcome();
        if !self.started || outcome.is_over() {
            return MoveResult::rejected(outcome);
        }
        if !self.board.is_valid_position(from)
            || !self.board.is_valid_position(to)
            || self.board.is_blocked(from)
            || self.board.is_blocked(to)
            || from.distance(&to) != 1
        {
            return MoveResult::rejected(outcome);
        }

        self.board.swap(from, to);
        // Moves are consumed outside the combo phase only; the cascade below
        // runs entirely inside it.
        self.moves_used += 1;

        let (merge_results, cascade_rounds, final_combo, mut reshuffled, mut stuck) =
            self.run_cascade();

        // A swap can break the board's only adjacency without producing a
        // match; the playability guarantee covers that case too.
        let (extra_reshuffled, extra_stuck) =
            ensure_playable(&mut self.board, &self.rules, &mut self.rng);
        reshuffled |= extra_reshuffled;
        stuck |= extra_stuck;
        self.board_stuck |= stuck;

        let score_delta = merge_results.iter().map(|m| m.score_delta).sum();

        MoveResult {
            accepted: true,
            merge_results,
            score_delta,
            final_combo_count: final_combo,
            cascade_rounds,
            reshuffled,
            board_stuck: stuck,
            outcome: self.outcome(),
        }
    }

    /// Fire the ultimate skill. Requires a full energy meter; consumes it,
    /// injects the configured number of guaranteed matches, and resolves each
    /// resulting cascade.
    pub fn trigger_ultimate(&mut self) -> Result<UltimateResult, EngineError> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        if self.outcome().is_over() {
            return Err(EngineError::SessionOver);
        }
        if self.energy < MAX_ENERGY {
            return Err(EngineError::UltimateNotReady {
                energy: self.energy,
            });
        }

        self.energy = 0;

        let mut merge_results = Vec::new();
        let mut forced_rounds = 0;
        let mut reshuffled = false;
        let mut stuck = false;

        for _ in 0..self.rules.ultimate_forced_matches.max(1) {
            if !self.inject_forced_match() {
                break;
            }
            forced_rounds += 1;
            let (results, _, _, round_reshuffled, round_stuck) = self.run_cascade();
            merge_results.extend(results);
            reshuffled |= round_reshuffled;
            stuck |= round_stuck;
            if stuck {
                break;
            }
        }

        let score_delta = merge_results.iter().map(|m| m.score_delta).sum();
        Ok(UltimateResult {
            forced_rounds,
            merge_results,
            score_delta,
            reshuffled,
            board_stuck: stuck,
            outcome: self.outcome(),
        })
    }

    /// Advance the wall-clock timers. Time and the shuffle interval are never
    /// consumed during a cascade (the combo-phase flag guards this), after
    /// game over, or before `start()`.
    pub fn tick(&mut self, elapsed_ms: u32) -> TickReport {
        let mut reshuffled = false;

        if !self.started || self.combo.in_combo_phase || self.outcome().is_over() {
            return TickReport {
                outcome: self.outcome(),
                reshuffled,
            };
        }

        if let Some(remaining) = self.time_remaining_ms {
            self.time_remaining_ms = Some(remaining.saturating_sub(elapsed_ms));
        }

        if let Some(interval) = self.rules.shuffle_interval_ms {
            self.shuffle_timer_ms += elapsed_ms;
            if self.shuffle_timer_ms >= interval {
                self.shuffle_timer_ms = 0;
                reshuffled = self.shuffle_board();
            }
        }

        TickReport {
            outcome: self.outcome(),
            reshuffled,
        }
    }

    /// Discard the attempt and begin a fresh one on the same rules. The RNG
    /// continues from its current state so restarts do not replay the same
    /// board; the episode id increments.
    pub fn restart(&mut self) {
        let next_seed = self.rng.state();
        let next_episode = self.episode_id.wrapping_add(1);
        let rules = self.rules.clone();
        *self = Self::new(rules, next_seed);
        self.episode_id = next_episode;
        self.start();
    }

    /// Run the merge/refill cascade to a fixed point. Returns the merges, the
    /// number of rounds, the peak combo count, and the refill signals.
    fn run_cascade(&mut self) -> (Vec<MergeResult>, u32, u32, bool, bool) {
        self.combo.in_combo_phase = true;

        let mut merge_results = Vec::new();
        let mut rounds = 0;
        let mut reshuffled = false;
        let mut stuck = false;

        loop {
            let groups = find_all_matches(&self.board, self.rules.min_match_size);
            if groups.is_empty() {
                break;
            }
            rounds += 1;

            for group in &groups {
                // A side effect from an earlier merge in this round (row,
                // neighbor, or wide clear) can remove members of a sibling
                // group. Re-flood from a surviving member and resolve only
                // what is actually on the board; a gutted group that no
                // longer qualifies is skipped, not resurrected. The first
                // group of a round always survives intact, so every round
                // makes progress.
                let seed = group
                    .members
                    .iter()
                    .copied()
                    .find(|pos| self.board.get(*pos) == Some(group.rank));
                let Some(seed) = seed else {
                    continue;
                };
                let Some(live) =
                    find_matches_from(&self.board, seed, self.rules.min_match_size)
                else {
                    continue;
                };

                self.combo.combo_count += 1;
                let result = resolve_merge(&mut self.board, &live, self.combo.combo_count);
                self.score += result.score_delta;
                self.energy = (self.energy + result.energy_delta).min(MAX_ENERGY);
                self.merges += 1;
                merge_results.push(result);
            }

            let report = top_up(&mut self.board, &self.rules, &mut self.rng);
            reshuffled |= report.reshuffled;
            if report.board_stuck {
                stuck = true;
                break;
            }
        }

        // Scan yielded no matches: the combo phase ends and the counter
        // resets; time/move consumption resumes with the caller.
        let final_combo = self.combo.combo_count;
        self.combo = ComboState::default();

        self.board_stuck |= stuck;
        (merge_results, rounds, final_combo, reshuffled, stuck)
    }

    /// Re-roll every tile's rank in place, then restore playability.
    /// Returns true when anything changed.
    fn shuffle_board(&mut self) -> bool {
        let positions = self.board.tile_positions();
        if positions.len() < 2 {
            return false;
        }
        let mut ranks: Vec<Rank> = positions
            .iter()
            .map(|pos| self.board.get(*pos).expect("tile position is occupied"))
            .collect();
        self.rng.shuffle(&mut ranks);
        for (pos, rank) in positions.into_iter().zip(ranks) {
            self.board.set(pos, Some(rank));
        }

        let (_, stuck) = ensure_playable(&mut self.board, &self.rules, &mut self.rng);
        self.board_stuck |= stuck;
        true
    }

    /// Force a connected same-rank triple around a random anchor tile.
    /// Returns false when the board has too few tiles to form one.
    fn inject_forced_match(&mut self) -> bool {
        let occupied = self.board.tile_positions();
        if occupied.len() < self.rules.min_match_size {
            return false;
        }

        let start = self.rng.next_range(occupied.len() as u32) as usize;
        for offset in 0..occupied.len() {
            let anchor = occupied[(start + offset) % occupied.len()];
            let neighbors: Vec<AxialCoord> = anchor
                .neighbors()
                .into_iter()
                .filter(|pos| self.board.get(*pos).is_some())
                .collect();
            if neighbors.len() >= self.rules.min_match_size - 1 {
                let rank = self.board.get(anchor).expect("anchor is occupied");
                for pos in neighbors.into_iter().take(self.rules.min_match_size - 1) {
                    self.board.set(pos, Some(rank));
                }
                return true;
            }
        }
        false
    }

    /// Whether any match is reachable right now (playability query)
    pub fn has_possible_matches(&self) -> bool {
        has_possible_matches(&self.board, self.rules.min_match_size)
    }
}
