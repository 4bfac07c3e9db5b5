//! Output for renderers
//!
//! The map layer draws GeoJSON-like features (geometry + property bag).
//! Static export works in SVG space, which is y-down, so paper coordinates
//! are flipped through a [`PaperTransform`].

use glam::{DVec2, dvec2};
use serde_json::{Map, Value as JsonValue, json};

use super::context::CourseLayout;
use super::geometry::Geometry;
use super::special::SpecialGeometry;
use super::symbols::{Symbol, SymbolEnum};
use crate::course::{Control, ControlKind, Course};
use crate::types::BBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Start,
    Control,
    Finish,
    /// Connector leg
    Line,
    Number,
    WhiteOut,
    Descriptions,
    SpecialLine,
}

impl FeatureKind {
    fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Start => "start",
            FeatureKind::Control => "control",
            FeatureKind::Finish => "finish",
            FeatureKind::Line => "line",
            FeatureKind::Number => "number",
            FeatureKind::WhiteOut => "white-out",
            FeatureKind::Descriptions => "descriptions",
            FeatureKind::SpecialLine => "special-line",
        }
    }
}

/// A geometry with its property bag
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub geometry: Geometry,
    pub properties: Map<String, JsonValue>,
}

impl Feature {
    fn new(kind: FeatureKind, geometry: Geometry, mut properties: Map<String, JsonValue>) -> Self {
        properties.insert("kind".into(), JsonValue::from(kind.as_str()));
        Self {
            kind,
            geometry,
            properties,
        }
    }

    pub fn to_geojson(&self) -> JsonValue {
        json!({
            "type": "Feature",
            "geometry": self.geometry.to_geojson(),
            "properties": self.properties,
        })
    }
}

fn control_properties(control: &Control) -> Result<Map<String, JsonValue>, serde_json::Error> {
    match serde_json::to_value(control)? {
        JsonValue::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn special_feature(shape: &SpecialGeometry) -> Feature {
    let mut props = Map::new();
    props.insert("id".into(), JsonValue::from(shape.id()));
    let kind = match shape {
        SpecialGeometry::WhiteOut { .. } => FeatureKind::WhiteOut,
        SpecialGeometry::Descriptions { .. } => FeatureKind::Descriptions,
        SpecialGeometry::Line { color, width, .. } => {
            if let Some(color) = color {
                props.insert("color".into(), JsonValue::from(color.as_str()));
            }
            if let Some(width) = width {
                props.insert("width".into(), JsonValue::from(*width));
            }
            FeatureKind::SpecialLine
        }
    };
    Feature::new(kind, shape.obstacle(), props)
}

impl CourseLayout {
    /// Features for the map layer: special objects, legs, controls, numbers.
    pub fn features(&self, course: &Course) -> Result<Vec<Feature>, serde_json::Error> {
        let mut features: Vec<Feature> = self.special.iter().map(special_feature).collect();

        for leg in self.legs() {
            let mut props = Map::new();
            props.insert("from".into(), JsonValue::from(leg.from.0));
            props.insert("to".into(), JsonValue::from(leg.to.0));
            features.push(Feature::new(FeatureKind::Line, leg.geometry(), props));
        }

        for control in &course.controls {
            let mut props = control_properties(control)?;
            let kind = match control.kind {
                ControlKind::Start => {
                    props.insert("rotation".into(), JsonValue::from(self.start_rotation));
                    FeatureKind::Start
                }
                ControlKind::Normal => FeatureKind::Control,
                ControlKind::Finish => FeatureKind::Finish,
            };
            features.push(Feature::new(kind, Geometry::Point(control.coordinates), props));
        }

        for number in &self.labels {
            let mut props = control_properties(&number.control)?;
            props.insert("label".into(), JsonValue::from(number.label.as_str()));
            features.push(Feature::new(FeatureKind::Number, Geometry::Point(number.position), props));
        }

        Ok(features)
    }

    /// A GeoJSON `FeatureCollection` of [`CourseLayout::features`].
    pub fn feature_collection(&self, course: &Course) -> Result<JsonValue, serde_json::Error> {
        let features: Vec<JsonValue> = self.features(course)?.iter().map(Feature::to_geojson).collect();
        Ok(json!({ "type": "FeatureCollection", "features": features }))
    }

    /// Symbol outlines of every control, sized and rotated as laid out.
    pub fn symbol_outlines(&self, course: &Course) -> Vec<Geometry> {
        course
            .controls
            .iter()
            .flat_map(|c| {
                SymbolEnum::for_control(c, self.circle_diameter, self.start_rotation)
                    .outline(self.object_scale)
            })
            .collect()
    }
}

/// Paper millimetres (y-up) to SVG user units (y-down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperTransform {
    pub offset_x: f64,
    /// Paper y that maps to SVG y = 0
    pub max_y: f64,
    pub px_per_mm: f64,
}

impl PaperTransform {
    /// Transform that puts `bounds`, grown by `margin` mm, at the SVG origin.
    pub fn fit(bounds: &BBox, margin: f64, px_per_mm: f64) -> Self {
        Self {
            offset_x: margin - bounds.min.x,
            max_y: bounds.max.y + margin,
            px_per_mm,
        }
    }

    pub fn to_svg(&self, p: DVec2) -> DVec2 {
        dvec2((p.x + self.offset_x) * self.px_per_mm, (self.max_y - p.y) * self.px_per_mm)
    }

    pub fn from_svg(&self, p: DVec2) -> DVec2 {
        dvec2(p.x / self.px_per_mm - self.offset_x, self.max_y - p.y / self.px_per_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{ControlId, MapInfo};
    use crate::layout::context::{LayoutInput, LayoutTarget};
    use crate::layout::defaults::{CircleDiameter, START_TRIANGLE_RADIUS};
    use crate::types::MapScale;

    fn laid_out(diameter: CircleDiameter) -> (Course, CourseLayout) {
        let course = Course::new(1, "Middle", 10000.0).with_controls(vec![
            Control::new(ControlId(1), ControlKind::Start, dvec2(0.0, 0.0)),
            Control::new(ControlId(2), ControlKind::Normal, dvec2(40.0, 0.0)),
            Control::new(ControlId(3), ControlKind::Finish, dvec2(40.0, 30.0)),
        ]);
        let mut input = LayoutInput {
            map: MapInfo::new(MapScale::try_new(10000.0).unwrap()),
            target: LayoutTarget::MapLayer,
            ..LayoutInput::default()
        };
        input.appearance.circle_diameter = diameter;
        let layout = CourseLayout::compute(&course, &input).unwrap();
        (course, layout)
    }

    fn radius_from(center: DVec2, g: &Geometry) -> f64 {
        let Geometry::Polygon(ring) = g else {
            panic!("symbol outlines are polygons");
        };
        (ring[0] - center).length()
    }

    #[test]
    fn outlines_follow_layout_scale_and_rotation() {
        let (course, layout) = laid_out(CircleDiameter::Isom);
        assert_eq!(layout.object_scale, 2.0);
        let outlines = layout.symbol_outlines(&course);
        assert_eq!(outlines.len(), 4);

        // Start faces east toward the first control
        let Geometry::Polygon(triangle) = &outlines[0] else {
            panic!("start outline should be a polygon");
        };
        assert!((triangle[0] - dvec2(START_TRIANGLE_RADIUS * 2.0, 0.0)).length() < 1e-9);

        assert!((radius_from(dvec2(40.0, 0.0), &outlines[1]) - (5.0 - 0.35)).abs() < 1e-9);
        assert!((radius_from(dvec2(40.0, 30.0), &outlines[2]) - 4.0).abs() < 1e-9);
        assert!((radius_from(dvec2(40.0, 30.0), &outlines[3]) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn outlines_use_the_layout_circle_diameter() {
        let (course, layout) = laid_out(CircleDiameter::Legacy);
        assert_eq!(layout.circle_diameter, CircleDiameter::Legacy);
        let outlines = layout.symbol_outlines(&course);
        assert!((radius_from(dvec2(40.0, 0.0), &outlines[1]) - (5.9 - 0.35)).abs() < 1e-9);
    }

    #[test]
    fn svg_flip_puts_top_at_zero() {
        let bounds = BBox::from_corners(dvec2(10.0, 20.0), dvec2(110.0, 220.0));
        let t = PaperTransform::fit(&bounds, 5.0, 2.0);
        assert_eq!(t.to_svg(dvec2(10.0, 225.0)), dvec2(30.0, 0.0));
        assert_eq!(t.to_svg(dvec2(10.0, 20.0)), dvec2(30.0, 410.0));
        assert_eq!(t.from_svg(t.to_svg(dvec2(42.0, 77.0))), dvec2(42.0, 77.0));
    }

    #[test]
    fn feature_serializes_as_geojson() {
        let f = Feature::new(FeatureKind::Line, Geometry::segment(dvec2(0.0, 0.0), dvec2(1.0, 2.0)), Map::new());
        insta::assert_json_snapshot!(f.to_geojson(), @r#"
        {
          "geometry": {
            "coordinates": [
              [
                0.0,
                0.0
              ],
              [
                1.0,
                2.0
              ]
            ],
            "type": "LineString"
          },
          "properties": {
            "kind": "line"
          },
          "type": "Feature"
        }
        "#);
    }
}
