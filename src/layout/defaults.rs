//! Symbol sizes and placement settings (paper millimetres, ISOM values)

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Control circle outside diameter
pub const CIRCLE_OUTSIDE_DIAMETER: f64 = 5.0;
/// Control circle diameter of the older description-sheet drawing path
pub const LEGACY_CIRCLE_OUTSIDE_DIAMETER: f64 = 5.9;
/// Overprint line width
pub const LINE_WIDTH: f64 = 0.35;
/// Start triangle circumradius: sqrt(6² + 3²) / 2
pub const START_TRIANGLE_RADIUS: f64 = 3.354_101_966_249_684_5;
pub const FINISH_INNER_RADIUS: f64 = 2.0;
pub const FINISH_OUTER_RADIUS: f64 = 3.0;

/// Extra room between control circle and number, scaled with the symbol
pub const NUMBER_CIRCLE_CUSHION: f64 = 0.5;
/// Fixed room between control circle and number
pub const TEXT_CUSHION: f64 = 1.2;
/// First candidate angle of the label sweep (upper right)
pub const LABEL_START_ANGLE: f64 = PI / 6.0;
pub const LABEL_ANGLE_STEP: f64 = PI / 16.0;
pub const LABEL_CANDIDATES: usize = 32;
/// Clearances closer than this count as a tie
pub const LABEL_TIE_TOLERANCE: f64 = 1e-9;
/// Obstacles further than this many text distances are ignored
pub const LABEL_PRUNE_FACTOR: f64 = 4.0;

/// Map scale the RelativeTo15000 mode sizes symbols for
pub const REFERENCE_SCALE: f64 = 15000.0;
/// Multiplier the live map layer applies to RelativeToMap object scale
pub const LEGACY_RELATIVE_TO_MAP_FACTOR: f64 = 2.0;

/// Segments used when a ring is approximated by a polygon
pub const RING_SEGMENTS: usize = 32;

/// Which control circle diameter a drawing path uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleDiameter {
    #[default]
    Isom,
    Legacy,
}

impl CircleDiameter {
    pub fn mm(self) -> f64 {
        match self {
            CircleDiameter::Isom => CIRCLE_OUTSIDE_DIAMETER,
            CircleDiameter::Legacy => LEGACY_CIRCLE_OUTSIDE_DIAMETER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_triangle_radius_matches_isom_size() {
        let expected = (6.0_f64 * 6.0 + 3.0 * 3.0).sqrt() / 2.0;
        assert!((START_TRIANGLE_RADIUS - expected).abs() < 1e-15);
    }

    #[test]
    fn sweep_covers_full_turn() {
        assert!((LABEL_ANGLE_STEP * LABEL_CANDIDATES as f64 - 2.0 * PI).abs() < 1e-12);
    }
}
