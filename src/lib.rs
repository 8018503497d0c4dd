//! hexmerge - hexagonal tile-merging puzzle engine.
//!
//! The deterministic board-and-match core of a hex merge game: axial
//! coordinate geometry, a sparse board with blocked cells, BFS flood-fill
//! match detection, merge resolution with rank-specific side effects,
//! weighted refill with playability guarantees, and a session that runs the
//! combo cascade to a fixed point per player move.
//!
//! Rendering, audio, persistence, and level-content authoring are external
//! collaborators: they feed `LevelRules` and grid-snapped input coordinates
//! in, and consume `MoveResult`s and `SessionSnapshot`s out.

pub mod core;
pub mod error;
pub mod types;

pub use crate::core::{
    AxialCoord, Board, GameSession, LevelOutcome, LevelRules, MatchGroup, MergeResult, MoveResult,
    PixelLayout, SessionSnapshot,
};
pub use crate::error::EngineError;
pub use crate::types::Rank;
