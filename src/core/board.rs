//! Board module - sparse hexagonal tile map
//!
//! The board owns a mapping from axial coordinates to tiles plus a set of
//! blocked cells (cells that exist geometrically but accept no tile). A
//! coordinate is either absent from the shape, blocked, or holds at most one
//! tile - never blocked and occupied at once.
//!
//! The board is purely logical state: it can be constructed and tested with
//! zero rendering dependency. Lifetime is one level attempt; `clear()` resets
//! it on restart.

use std::collections::{HashMap, HashSet};

use crate::core::axial::AxialCoord;
use crate::types::{Cell, Rank};

/// Sparse hexagonal board of a fixed radius with an optional formation shape
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    radius: i32,
    tiles: HashMap<AxialCoord, Rank>,
    blocked: HashSet<AxialCoord>,
    /// Level formation: when present, only these cells are part of the shape.
    /// `None` means the full hexagon of `radius`.
    formation: Option<HashSet<AxialCoord>>,
}

impl Board {
    /// Create an empty board covering the full hexagon of the given radius
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            tiles: HashMap::new(),
            blocked: HashSet::new(),
            formation: None,
        }
    }

    /// Create an empty board restricted to a formation shape. Cells outside
    /// the radius are invalid regardless of the formation contents.
    pub fn with_formation(radius: i32, formation: HashSet<AxialCoord>) -> Self {
        Self {
            radius,
            tiles: HashMap::new(),
            blocked: HashSet::new(),
            formation: Some(formation),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Whether a coordinate is part of the playable shape
    pub fn is_valid_position(&self, pos: AxialCoord) -> bool {
        if pos.magnitude() > self.radius {
            return false;
        }
        match &self.formation {
            Some(shape) => shape.contains(&pos),
            None => true,
        }
    }

    pub fn is_blocked(&self, pos: AxialCoord) -> bool {
        self.blocked.contains(&pos)
    }

    /// Get the tile at a position, if any
    pub fn get(&self, pos: AxialCoord) -> Option<Rank> {
        self.tiles.get(&pos).copied()
    }

    /// Set or clear the cell at a position. Returns false (no mutation) if
    /// the position is outside the shape.
    ///
    /// Blocked cells are NOT rejected here; callers check `is_blocked`
    /// themselves before placement.
    pub fn set(&mut self, pos: AxialCoord, cell: Cell) -> bool {
        if !self.is_valid_position(pos) {
            return false;
        }
        match cell {
            Some(rank) => {
                self.tiles.insert(pos, rank);
            }
            None => {
                self.tiles.remove(&pos);
            }
        }
        true
    }

    /// Remove and return the tile at a position
    pub fn remove(&mut self, pos: AxialCoord) -> Option<Rank> {
        self.tiles.remove(&pos)
    }

    /// Mark a cell as blocked. Fails if the position is invalid or occupied
    /// (a cell is never blocked and occupied at once).
    pub fn block(&mut self, pos: AxialCoord) -> bool {
        if !self.is_valid_position(pos) || self.tiles.contains_key(&pos) {
            return false;
        }
        self.blocked.insert(pos);
        true
    }

    pub fn unblock(&mut self, pos: AxialCoord) -> bool {
        self.blocked.remove(&pos)
    }

    /// All shape-valid positions, in deterministic (q, r) order
    pub fn positions(&self) -> impl Iterator<Item = AxialCoord> + '_ {
        AxialCoord::new(0, 0)
            .within_range(self.radius)
            .into_iter()
            .filter(|pos| self.is_valid_position(*pos))
    }

    /// Positions of all placed tiles, sorted for deterministic iteration
    pub fn tile_positions(&self) -> Vec<AxialCoord> {
        let mut out: Vec<AxialCoord> = self.tiles.keys().copied().collect();
        out.sort();
        out
    }

    /// All placed tiles as (position, rank), sorted by position
    pub fn tiles(&self) -> Vec<(AxialCoord, Rank)> {
        let mut out: Vec<(AxialCoord, Rank)> = self
            .tiles
            .iter()
            .map(|(pos, rank)| (*pos, *rank))
            .collect();
        out.sort();
        out
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Empty cells that can legally receive a tile, sorted
    pub fn empty_positions(&self) -> Vec<AxialCoord> {
        self.positions()
            .filter(|pos| !self.is_blocked(*pos) && !self.tiles.contains_key(pos))
            .collect()
    }

    /// Exchange the occupants of two positions (either may be empty).
    /// Fails without mutation if either position is outside the shape.
    pub fn swap(&mut self, a: AxialCoord, b: AxialCoord) -> bool {
        if !self.is_valid_position(a) || !self.is_valid_position(b) {
            return false;
        }
        let tile_a = self.tiles.remove(&a);
        let tile_b = self.tiles.remove(&b);
        if let Some(rank) = tile_b {
            self.tiles.insert(a, rank);
        }
        if let Some(rank) = tile_a {
            self.tiles.insert(b, rank);
        }
        true
    }

    /// Empty tiles and blocked cells - used on restart, not on refill
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.blocked.clear();
    }
}
