//! Core module - pure game logic with no external dependencies
//!
//! Everything needed to run one level attempt: hex geometry, the sparse
//! board, the flood-fill match detector, merge/cascade resolution, weighted
//! refill, and the session that ties them together. No UI, networking, or
//! I/O anywhere in here.

pub mod axial;
pub mod board;
pub mod matching;
pub mod refill;
pub mod resolver;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use axial::{AxialCoord, PixelLayout};
pub use board::Board;
pub use matching::{find_all_matches, find_matches_from, has_possible_matches, MatchGroup};
pub use refill::{ensure_playable, initial_fill, top_up, RefillReport};
pub use resolver::{resolve_merge, MergeResult};
pub use rng::{SimpleRng, SpawnTable};
pub use rules::{evaluate_outcome, DefeatReason, LevelOutcome, LevelRules};
pub use scoring::{calculate_cultivation_growth, calculate_match_score, calculate_stars, StarThresholds};
pub use session::{ComboState, GameSession, MoveResult, TickReport, UltimateResult};
pub use snapshot::{SessionSnapshot, TileSnapshot};
