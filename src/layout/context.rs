//! Layout context - runs the whole pipeline for one course

use serde::{Deserialize, Serialize};

use super::connectors::{Connector, compute_connectors};
use super::defaults::CircleDiameter;
use super::geometry::Geometry;
use super::labels::{LabelSettings, NumberLabel, place_labels};
use super::special::{SpecialGeometry, special_geometries};
use crate::aggregate::{course_bounds, course_distance, start_rotation};
use crate::course::{Course, CourseAppearance, Event, MapInfo, SpecialObject};
use crate::errors::{LayoutError, LayoutWarning};
use crate::scale::{map_layer_object_scale, object_scale};
use crate::types::{BBox, MapScale, check_positive};

/// Where the computed geometry is going to be drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutTarget {
    /// Interactive map layer
    MapLayer,
    /// Print and export (SVG, PDF, description sheets)
    #[default]
    Print,
}

/// Inputs of one layout run besides the course itself
#[derive(Clone, Debug, Default)]
pub struct LayoutInput<'a> {
    pub appearance: CourseAppearance,
    pub map: MapInfo,
    /// Objects from outside the course that still show on it
    pub shared_objects: &'a [SpecialObject],
    /// Further geometry numbers must keep clear of
    pub extra_obstacles: &'a [Geometry],
    pub target: LayoutTarget,
}

/// Everything derived from a course for drawing it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CourseLayout {
    pub course_id: u32,
    pub object_scale: f64,
    /// Circle size the symbols were spaced for
    pub circle_diameter: CircleDiameter,
    pub start_rotation: f64,
    /// Index-aligned with the legs; `None` where controls are too close
    pub connectors: Vec<Option<Connector>>,
    pub labels: Vec<NumberLabel>,
    pub special: Vec<SpecialGeometry>,
    pub distance_km: f64,
    pub bounds: BBox,
    #[serde(skip)]
    pub warnings: Vec<LayoutWarning>,
}

impl CourseLayout {
    pub fn compute(course: &Course, input: &LayoutInput<'_>) -> Result<Self, LayoutError> {
        let map_scale = input.map.scale;
        // A scale that came through serde has not been validated yet
        MapScale::try_new(map_scale.raw()).map_err(|source| LayoutError::InvalidMapScale {
            value: map_scale.raw(),
            source,
        })?;
        check_positive(course.print_scale).map_err(|source| LayoutError::InvalidPrintScale {
            value: course.print_scale,
            source,
        })?;

        let appearance = &input.appearance;
        let scale = match input.target {
            LayoutTarget::MapLayer => {
                map_layer_object_scale(appearance.scale_sizes, map_scale, course.print_scale)
            }
            LayoutTarget::Print => object_scale(appearance.scale_sizes, map_scale, course.print_scale),
        };

        let connectors = compute_connectors(&course.controls, course.course_type, appearance, scale);

        let (special, warnings) = special_geometries(
            course.special_objects.iter().chain(input.shared_objects.iter()),
        );
        let obstacles: Vec<Geometry> = special
            .iter()
            .map(SpecialGeometry::obstacle)
            .chain(input.extra_obstacles.iter().cloned())
            .collect();

        let settings = LabelSettings {
            scale,
            diameter: appearance.circle_diameter,
            label_kind: course.label_kind,
        };
        let labels = place_labels(&course.controls, &connectors, &obstacles, &settings);

        let layout = CourseLayout {
            course_id: course.id,
            object_scale: scale,
            circle_diameter: appearance.circle_diameter,
            start_rotation: start_rotation(&course.controls),
            connectors,
            labels,
            special,
            distance_km: course_distance(&course.controls, map_scale),
            bounds: course_bounds(&course.controls),
            warnings,
        };

        crate::log::debug!(
            course = course.id,
            object_scale = layout.object_scale,
            legs = layout.connectors.iter().flatten().count(),
            labels = layout.labels.len(),
            warnings = layout.warnings.len(),
            "course layout"
        );

        Ok(layout)
    }

    /// Connectors that survived trimming, in course order
    pub fn legs(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().flatten()
    }
}

impl Event {
    /// Lay out one course with the event's appearance, map and all-courses objects.
    pub fn layout_course(&self, course_id: u32, target: LayoutTarget) -> Result<CourseLayout, LayoutError> {
        let course = self
            .course(course_id)
            .ok_or(LayoutError::UnknownCourse { id: course_id })?;
        let shared = self.all_courses_objects();
        let input = LayoutInput {
            appearance: self.appearance,
            map: self.map,
            shared_objects: &shared,
            extra_obstacles: &[],
            target,
        };
        CourseLayout::compute(course, &input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Control, ControlId, ControlKind, CourseType, SpecialObjectKind};
    use crate::scale::ScaleSizes;
    use glam::dvec2;

    fn course() -> Course {
        Course::new(1, "Middle", 10000.0).with_controls(vec![
            Control::new(ControlId(1), ControlKind::Start, dvec2(0.0, 0.0)),
            Control::new(ControlId(2), ControlKind::Normal, dvec2(40.0, 0.0)),
            Control::new(ControlId(3), ControlKind::Finish, dvec2(40.0, 30.0)),
        ])
    }

    fn input<'a>(target: LayoutTarget) -> LayoutInput<'a> {
        LayoutInput {
            map: MapInfo::new(MapScale::try_new(10000.0).unwrap()),
            target,
            ..LayoutInput::default()
        }
    }

    #[test]
    fn computes_every_part() {
        let layout = CourseLayout::compute(&course(), &input(LayoutTarget::Print)).unwrap();
        assert_eq!(layout.object_scale, 1.0);
        assert_eq!(layout.connectors.len(), 2);
        assert_eq!(layout.legs().count(), 2);
        assert_eq!(layout.labels.len(), 1);
        assert_eq!(layout.labels[0].label, "1");
        assert!((layout.distance_km - 0.7).abs() < 1e-12);
        assert_eq!(layout.bounds.to_array(), [0.0, 0.0, 40.0, 30.0]);
        assert!((layout.start_rotation + 90.0).abs() < 1e-12);
        assert!(layout.warnings.is_empty());
    }

    #[test]
    fn map_layer_uses_legacy_scale() {
        let layout = CourseLayout::compute(&course(), &input(LayoutTarget::MapLayer)).unwrap();
        assert_eq!(layout.object_scale, 2.0);

        let mut fixed = input(LayoutTarget::MapLayer);
        fixed.appearance.scale_sizes = ScaleSizes::None;
        assert_eq!(CourseLayout::compute(&course(), &fixed).unwrap().object_scale, 1.0);
    }

    #[test]
    fn score_course_has_labels_but_no_legs() {
        let c = course().with_type(CourseType::Score);
        let layout = CourseLayout::compute(&c, &input(LayoutTarget::Print)).unwrap();
        assert!(layout.connectors.is_empty());
        assert_eq!(layout.labels.len(), 1);
    }

    #[test]
    fn special_object_warnings_are_collected() {
        let mut c = course();
        c.special_objects.push(SpecialObject::new(
            9,
            SpecialObjectKind::Other("photo".into()),
            vec![dvec2(0.0, 0.0)],
        ));
        let layout = CourseLayout::compute(&c, &input(LayoutTarget::Print)).unwrap();
        assert_eq!(layout.warnings.len(), 1);
        assert!(layout.special.is_empty());
    }

    #[test]
    fn invalid_map_scale_is_rejected() {
        let map: MapInfo = serde_json::from_str(r#"{"scale": 0}"#).unwrap();
        let bad = LayoutInput {
            map,
            ..LayoutInput::default()
        };
        let err = CourseLayout::compute(&course(), &bad).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidMapScale { value, .. } if value == 0.0));
    }

    #[test]
    fn invalid_print_scale_is_rejected() {
        for bad in [0.0, -10000.0, f64::NAN] {
            let mut c = course();
            c.print_scale = bad;
            let err = CourseLayout::compute(&c, &input(LayoutTarget::Print)).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidPrintScale { .. }), "{bad}: {err}");
        }

        let json = r#"{"id": 1, "name": "Flipped", "printScale": -10000}"#;
        let flipped: Course = serde_json::from_str(json).unwrap();
        let err = CourseLayout::compute(&flipped, &input(LayoutTarget::MapLayer)).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid print scale -10000: value is negative");
    }

    #[test]
    fn event_layout_includes_all_courses_objects() {
        let mut event = Event {
            map: MapInfo::new(MapScale::try_new(10000.0).unwrap()),
            courses: vec![course()],
            ..Event::default()
        };
        let mut shared = SpecialObject::new(
            4,
            SpecialObjectKind::WhiteOut,
            vec![dvec2(100.0, 100.0), dvec2(110.0, 100.0), dvec2(110.0, 110.0)],
        );
        shared.is_all_courses = true;
        event.special_objects.push(shared);
        event.special_objects.push(SpecialObject::new(
            5,
            SpecialObjectKind::Line,
            vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0)],
        ));

        let layout = event.layout_course(1, LayoutTarget::Print).unwrap();
        assert_eq!(layout.special.len(), 1);
        assert_eq!(layout.special[0].id(), 4);

        assert_eq!(
            event.layout_course(2, LayoutTarget::Print).unwrap_err(),
            LayoutError::UnknownCourse { id: 2 }
        );
    }
}
