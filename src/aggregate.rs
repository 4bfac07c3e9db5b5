//! Whole-course figures: length, extent and start orientation.

use crate::course::{Control, ControlKind};
use crate::types::{BBox, MapScale};

/// Course length in kilometres: the straight-line legs between consecutive
/// controls, converted from paper millimetres at map scale.
pub fn course_distance(controls: &[Control], map_scale: MapScale) -> f64 {
    let paper_mm: f64 = controls
        .windows(2)
        .map(|pair| (pair[1].coordinates - pair[0].coordinates).length())
        .sum();
    paper_mm / 1_000_000.0 * map_scale.raw()
}

/// Bounding box of all control coordinates.
///
/// Without controls the box is inverted (`[+∞, +∞, -∞, -∞]`); check
/// [`BBox::is_empty`] first.
pub fn course_bounds(controls: &[Control]) -> BBox {
    controls.iter().map(|c| c.coordinates).collect()
}

/// Rotation of the start triangle in degrees: the direction from the start
/// toward the control after it, minus 90 so that 0 points straight up.
///
/// Returns 0 when the course has no start or nothing follows it.
pub fn start_rotation(controls: &[Control]) -> f64 {
    let Some(index) = controls.iter().position(|c| c.kind == ControlKind::Start) else {
        return 0.0;
    };
    let Some(next) = controls.get(index + 1) else {
        return 0.0;
    };
    let dir = next.coordinates - controls[index].coordinates;
    dir.y.atan2(dir.x).to_degrees() - 90.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::ControlId;
    use glam::dvec2;

    fn ctl(kind: ControlKind, x: f64, y: f64) -> Control {
        Control::new(ControlId(1), kind, dvec2(x, y))
    }

    #[test]
    fn distance_of_one_metre_of_paper_at_15000() {
        let controls = [ctl(ControlKind::Start, 0.0, 0.0), ctl(ControlKind::Finish, 1000.0, 0.0)];
        assert_eq!(course_distance(&controls, MapScale::ISOM_15000), 15.0);
    }

    #[test]
    fn distance_sums_legs() {
        let controls = [
            ctl(ControlKind::Start, 0.0, 0.0),
            ctl(ControlKind::Normal, 30.0, 40.0),
            ctl(ControlKind::Finish, 30.0, 0.0),
        ];
        let km = course_distance(&controls, MapScale::try_new(10000.0).unwrap());
        assert!((km - 0.9).abs() < 1e-12);
    }

    #[test]
    fn distance_of_empty_course_is_zero() {
        assert_eq!(course_distance(&[], MapScale::ISOM_15000), 0.0);
    }

    #[test]
    fn bounds_cover_controls() {
        let controls = [ctl(ControlKind::Normal, 5.0, -2.0), ctl(ControlKind::Normal, -1.0, 8.0)];
        assert_eq!(course_bounds(&controls).to_array(), [-1.0, -2.0, 5.0, 8.0]);
    }

    #[test]
    fn bounds_of_no_controls_are_inverted() {
        let bb = course_bounds(&[]);
        assert!(bb.is_empty());
        assert_eq!(
            bb.to_array(),
            [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY]
        );
    }

    #[test]
    fn start_rotation_points_at_next_control() {
        let north = [ctl(ControlKind::Start, 0.0, 0.0), ctl(ControlKind::Normal, 0.0, 10.0)];
        assert!(start_rotation(&north).abs() < 1e-12);

        let east = [ctl(ControlKind::Start, 0.0, 0.0), ctl(ControlKind::Normal, 10.0, 0.0)];
        assert!((start_rotation(&east) + 90.0).abs() < 1e-12);

        let west = [ctl(ControlKind::Start, 5.0, 5.0), ctl(ControlKind::Normal, -5.0, 5.0)];
        assert!((start_rotation(&west) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn start_rotation_without_start_or_next_is_zero() {
        assert_eq!(start_rotation(&[ctl(ControlKind::Normal, 0.0, 0.0)]), 0.0);
        assert_eq!(start_rotation(&[ctl(ControlKind::Start, 0.0, 0.0)]), 0.0);
        assert_eq!(start_rotation(&[]), 0.0);
    }
}
