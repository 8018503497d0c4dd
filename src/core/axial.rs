//! Axial hex coordinates
//!
//! Pointy-top hex grid addressed by axial coordinates (q, r) with the derived
//! cube coordinate s = -q - r. This is the only grid addressing in the
//! engine: the board, the match detector, and every result structure key off
//! `AxialCoord`.
//!
//! The neighbor order (E, NE, NW, W, SW, SE) is part of the public contract:
//! presentation code sequences effects in this order, so tests assert it.

use serde::{Deserialize, Serialize};

/// Square root of 3, used by the pixel transforms
const SQRT_3: f32 = 1.732_050_8;

/// Neighbor offsets in the fixed direction order: E, NE, NW, W, SW, SE
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Axial hex coordinate. Immutable value type; equality and hashing by (q, r).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived cube coordinate; q + r + s == 0 always holds
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The 6 neighbors in the fixed direction order (E, NE, NW, W, SW, SE)
    pub fn neighbors(&self) -> [AxialCoord; 6] {
        let mut out = [*self; 6];
        for (slot, (dq, dr)) in out.iter_mut().zip(DIRECTIONS) {
            *slot = AxialCoord::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// Hex grid distance (number of steps between cells)
    pub fn distance(&self, other: &Self) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Distance from the origin; cells with `magnitude() <= radius` form the
    /// standard hexagonal board of that radius
    pub fn magnitude(&self) -> i32 {
        (self.q.abs() + self.r.abs() + self.s().abs()) / 2
    }

    /// Round fractional axial coordinates to the nearest hex.
    ///
    /// Rounds all three cube components, then recomputes the component with
    /// the largest rounding error from the other two so q + r + s == 0 is
    /// preserved exactly. Drag-to-grid snapping depends on this exact
    /// tie-break.
    pub fn round(qf: f32, rf: f32) -> Self {
        let sf = -qf - rf;
        let mut rq = qf.round();
        let mut rr = rf.round();
        let rs = sf.round();

        let q_diff = (rq - qf).abs();
        let r_diff = (rr - rf).abs();
        let s_diff = (rs - sf).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// All coordinates within `range` steps of this cell (inclusive)
    pub fn within_range(&self, range: i32) -> Vec<AxialCoord> {
        let mut out = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                out.push(AxialCoord::new(self.q + q, self.r + r));
            }
        }
        out
    }
}

/// Pixel conversion context supplied by the presentation layer.
/// Pure affine transforms, no engine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelLayout {
    /// Distance from hex center to a corner, in pixels
    pub hex_size: f32,
    /// Pixel position of the grid origin
    pub center: (f32, f32),
}

impl PixelLayout {
    pub fn new(hex_size: f32, center: (f32, f32)) -> Self {
        Self { hex_size, center }
    }

    /// Pixel center of a hex (pointy-top layout)
    pub fn to_pixel(&self, pos: AxialCoord) -> (f32, f32) {
        let x = self.hex_size * (SQRT_3 * pos.q as f32 + SQRT_3 / 2.0 * pos.r as f32);
        let y = self.hex_size * (3.0 / 2.0 * pos.r as f32);
        (x + self.center.0, y + self.center.1)
    }

    /// Nearest hex for a pixel position (inverse of `to_pixel` plus rounding)
    pub fn from_pixel(&self, x: f32, y: f32) -> AxialCoord {
        let px = (x - self.center.0) / self.hex_size;
        let py = (y - self.center.1) / self.hex_size;
        let qf = SQRT_3 / 3.0 * px - py / 3.0;
        let rf = 2.0 / 3.0 * py;
        AxialCoord::round(qf, rf)
    }
}
