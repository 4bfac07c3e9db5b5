//! Geometry primitives: point-to-geometry distances and the geometry sum type
//!
//! Vector arithmetic (add, sub, scale, length) is plain `glam::DVec2`.

use glam::{DVec2, dvec2};
use serde_json::Value as JsonValue;

use crate::errors::LayoutError;
use crate::types::BBox;

/// Squared length, for comparisons that don't need the square root
#[inline]
pub fn length2(v: DVec2) -> f64 {
    v.length_squared()
}

/// Rotate counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    dvec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Distance from `p` to the segment `v`-`w`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond an
/// end measure to that end. A degenerate segment is a point.
pub fn line_segment_distance(p: DVec2, v: DVec2, w: DVec2) -> f64 {
    let seg = w - v;
    let len2 = length2(seg);
    if len2 == 0.0 {
        return (p - v).length();
    }
    let t = ((p - v).dot(seg) / len2).clamp(0.0, 1.0);
    (p - (v + seg * t)).length()
}

/// Geometry a label has to keep clear of
///
/// Converted to and from JSON only through the GeoJSON helpers.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(DVec2),
    LineString(Vec<DVec2>),
    /// Closed ring; the last vertex repeats the first
    Polygon(Vec<DVec2>),
}

impl Geometry {
    pub fn segment(start: DVec2, end: DVec2) -> Self {
        Geometry::LineString(vec![start, end])
    }

    /// Parse a GeoJSON geometry object.
    ///
    /// Unknown `type` tags are an error rather than something to guess at.
    pub fn from_geojson(value: &JsonValue) -> Result<Self, LayoutError> {
        let kind = value
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| malformed("missing `type`"))?;
        let coords = value
            .get("coordinates")
            .ok_or_else(|| malformed("missing `coordinates`"))?;

        match kind {
            "Point" => parse_position(coords).map(Geometry::Point),
            "LineString" => parse_positions(coords).map(Geometry::LineString),
            "Polygon" => {
                // Only the outer ring matters for clearance
                let outer = coords
                    .as_array()
                    .and_then(|rings| rings.first())
                    .ok_or_else(|| malformed("polygon without rings"))?;
                parse_positions(outer).map(Geometry::Polygon)
            }
            other => Err(LayoutError::UnsupportedGeometryKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Convert to a GeoJSON geometry object.
    pub fn to_geojson(&self) -> JsonValue {
        let pos = |p: &DVec2| serde_json::json!([p.x, p.y]);
        match self {
            Geometry::Point(p) => serde_json::json!({ "type": "Point", "coordinates": pos(p) }),
            Geometry::LineString(pts) => serde_json::json!({
                "type": "LineString",
                "coordinates": pts.iter().map(pos).collect::<Vec<_>>(),
            }),
            Geometry::Polygon(ring) => serde_json::json!({
                "type": "Polygon",
                "coordinates": [ring.iter().map(pos).collect::<Vec<_>>()],
            }),
        }
    }

    pub fn bounds(&self) -> BBox {
        match self {
            Geometry::Point(p) => BBox::from_corners(*p, *p),
            Geometry::LineString(pts) | Geometry::Polygon(pts) => pts.iter().copied().collect(),
        }
    }
}

fn malformed(reason: &str) -> LayoutError {
    LayoutError::MalformedGeometry {
        reason: reason.to_string(),
    }
}

fn parse_position(value: &JsonValue) -> Result<DVec2, LayoutError> {
    match value.as_array().map(Vec::as_slice) {
        Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok(dvec2(x, y)),
            _ => Err(malformed("non-numeric position")),
        },
        _ => Err(malformed("position needs two numbers")),
    }
}

fn parse_positions(value: &JsonValue) -> Result<Vec<DVec2>, LayoutError> {
    value
        .as_array()
        .ok_or_else(|| malformed("expected an array of positions"))?
        .iter()
        .map(parse_position)
        .collect()
}

/// Distance from `point` to the nearest part of `geometry`.
pub fn point_to_geometry_distance(point: DVec2, geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Point(p) => (point - *p).length(),
        Geometry::LineString(pts) | Geometry::Polygon(pts) => polyline_distance(point, pts),
    }
}

fn polyline_distance(point: DVec2, pts: &[DVec2]) -> f64 {
    match pts {
        [] => f64::INFINITY,
        [only] => (point - *only).length(),
        _ => pts
            .windows(2)
            .map(|w| line_segment_distance(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
