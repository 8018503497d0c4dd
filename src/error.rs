//! Engine error taxonomy
//!
//! Geometry and bounds problems are not errors: moves are simply rejected
//! (`MoveResult::accepted == false`). The variants here cover misuse of the
//! session API. Invariant violations inside the resolution loop are
//! programming errors and fail fast via debug assertions instead.

use thiserror::Error;

use crate::types::MAX_ENERGY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Ultimate skill requested before the energy meter is full.
    #[error("ultimate skill not ready: energy {energy}/{max}", max = MAX_ENERGY)]
    UltimateNotReady { energy: u32 },

    /// Input arrived before `start()` was called.
    #[error("session not started")]
    NotStarted,

    /// Input arrived after the level attempt ended.
    #[error("session is over")]
    SessionOver,
}
