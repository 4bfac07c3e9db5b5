//! Validated numeric primitives and bounding boxes.
//!
//! Coordinates are `glam::DVec2` in paper millimetres at the map's native
//! scale, y-axis up. Everything here is a plain `Copy` value.

use std::fmt;

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN, infinite, zero and negative values.
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Map scale denominator (15000 for a 1:15000 map).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MapScale(f64);

impl MapScale {
    /// Scale the ISOM symbol sizes are defined for.
    pub const ISOM_15000: MapScale = MapScale(15000.0);

    /// Create a MapScale with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(denominator: f64) -> Result<Self, NumericError> {
        check_positive(denominator).map(MapScale)
    }

    /// Get the raw denominator
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Default for MapScale {
    fn default() -> Self {
        MapScale::ISOM_15000
    }
}

impl fmt::Display for MapScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.0)
    }
}

/// Axis-aligned bounding box in paper millimetres.
///
/// The empty box is inverted (`min = +∞`, `max = -∞`) so that expanding it
/// by any point yields that point. Callers must check [`BBox::is_empty`]
/// before reading its extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Box spanning two arbitrary corners.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        BBox {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include another box
    pub fn expand_box(&mut self, other: &BBox) {
        if !other.is_empty() {
            self.expand_point(other.min);
            self.expand_point(other.max);
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Get the center point
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Upper-left corner in y-up space.
    pub fn top_left(&self) -> DVec2 {
        dvec2(self.min.x, self.max.y)
    }

    /// Lower-right corner in y-up space.
    pub fn bottom_right(&self) -> DVec2 {
        dvec2(self.max.x, self.min.y)
    }

    /// Corners counter-clockwise starting at `min`.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            dvec2(self.max.x, self.min.y),
            self.max,
            dvec2(self.min.x, self.max.y),
        ]
    }

    /// `[min_x, min_y, max_x, max_y]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<DVec2> for BBox {
    fn from_iter<I: IntoIterator<Item = DVec2>>(iter: I) -> Self {
        iter.into_iter().fold(BBox::new(), |mut bb, p| {
            bb.expand_point(p);
            bb
        })
    }
}
