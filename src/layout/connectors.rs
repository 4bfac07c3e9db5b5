//! Connector lines between consecutive controls
//!
//! Each leg is shortened at both ends so it stops short of the symbols it
//! joins: by the symbol clearance times the object scale, plus half the
//! auto leg gap. Legs too short to survive the trimming are left out.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::defaults::CircleDiameter;
use super::geometry::Geometry;
use super::symbols::spacing;
use crate::course::{Control, ControlId, CourseAppearance, CourseType};

/// A trimmed leg between two consecutive controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: ControlId,
    pub to: ControlId,
    pub start: DVec2,
    pub end: DVec2,
}

impl Connector {
    pub fn geometry(&self) -> Geometry {
        Geometry::segment(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }
}

/// Shorten the line `start`-`end` by `start_space` and `end_space`.
///
/// Returns `None` when nothing visible would remain.
pub fn chop_line(start: DVec2, end: DVec2, start_space: f64, end_space: f64) -> Option<(DVec2, DVec2)> {
    let delta = end - start;
    let len = delta.length();

    if len <= start_space + end_space {
        return None;
    }

    // Unit vector along the line
    let unit = delta / len;
    Some((start + unit * start_space, end - unit * end_space))
}

/// Connectors for a course, index-aligned with the legs.
///
/// Entry `i` is the leg from `controls[i]` to `controls[i + 1]`, or `None`
/// when those controls are too close to connect. Score and all-controls
/// courses have no legs: their control order is not a route.
///
/// Any other course type string is rejected with
/// [`LayoutError::UnknownCourseType`](crate::errors::LayoutError) when the
/// course is loaded, so it never reaches this function.
pub fn compute_connectors(
    controls: &[Control],
    course_type: CourseType,
    appearance: &CourseAppearance,
    scale: f64,
) -> Vec<Option<Connector>> {
    match course_type {
        CourseType::Normal => {}
        CourseType::Score | CourseType::AllControls => return Vec::new(),
    }

    let clearance = |c: &Control| {
        control_clearance(c, appearance.circle_diameter, scale, appearance.auto_leg_gap_size)
    };

    controls
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let chopped = chop_line(a.coordinates, b.coordinates, clearance(a), clearance(b));
            if chopped.is_none() {
                crate::log::trace!(from = a.id.0, to = b.id.0, "controls too close to connect");
            }
            chopped.map(|(start, end)| Connector {
                from: a.id,
                to: b.id,
                start,
                end,
            })
        })
        .collect()
}

/// Distance a leg stops short of `control`: symbol clearance at object
/// scale plus half the auto leg gap.
pub fn control_clearance(control: &Control, diameter: CircleDiameter, scale: f64, gap: f64) -> f64 {
    spacing(control, diameter) * scale + gap / 2.0
}
