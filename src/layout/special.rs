//! Special objects as geometry
//!
//! Special objects are stored as a compact list of locations. Layout needs
//! them as polygons, boxes and polylines: as obstacles for number placement
//! and as shapes for renderers. Malformed objects are skipped with a
//! warning rather than failing the course.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::course::{SpecialObject, SpecialObjectKind};
use crate::errors::LayoutWarning;
use crate::types::BBox;

/// Resolved geometry of one special object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpecialGeometry {
    /// Closed ring; last point repeats the first
    WhiteOut { id: u32, ring: Vec<DVec2> },
    /// Where the control description sheet is printed over the map
    Descriptions { id: u32, bounds: BBox },
    Line {
        id: u32,
        points: Vec<DVec2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
    },
}

impl SpecialGeometry {
    pub fn id(&self) -> u32 {
        match self {
            SpecialGeometry::WhiteOut { id, .. }
            | SpecialGeometry::Descriptions { id, .. }
            | SpecialGeometry::Line { id, .. } => *id,
        }
    }

    /// Boundary labels have to keep clear of
    pub fn obstacle(&self) -> Geometry {
        match self {
            SpecialGeometry::WhiteOut { ring, .. } => Geometry::Polygon(ring.clone()),
            SpecialGeometry::Descriptions { bounds, .. } => {
                let c = bounds.corners();
                Geometry::Polygon(vec![c[0], c[1], c[2], c[3], c[0]])
            }
            SpecialGeometry::Line { points, .. } => Geometry::LineString(points.clone()),
        }
    }

    /// Back to the compact location list a [`SpecialObject`] stores.
    ///
    /// Rings drop their closing point; boxes become top-left and
    /// bottom-right corners.
    pub fn to_locations(&self) -> Vec<DVec2> {
        match self {
            SpecialGeometry::WhiteOut { ring, .. } => ring[..ring.len().saturating_sub(1)].to_vec(),
            SpecialGeometry::Descriptions { bounds, .. } => {
                vec![bounds.top_left(), bounds.bottom_right()]
            }
            SpecialGeometry::Line { points, .. } => points.clone(),
        }
    }

    pub fn bounds(&self) -> BBox {
        match self {
            SpecialGeometry::Descriptions { bounds, .. } => *bounds,
            other => other.obstacle().bounds(),
        }
    }
}

/// Resolve one special object.
pub fn special_geometry(obj: &SpecialObject) -> Result<SpecialGeometry, LayoutWarning> {
    let locs = &obj.locations;
    let too_few = |kind, expected| LayoutWarning::TooFewLocations {
        id: obj.id,
        kind,
        expected,
        got: locs.len(),
    };

    match &obj.kind {
        SpecialObjectKind::WhiteOut => {
            if locs.len() < 3 {
                return Err(too_few("white-out", "at least 3"));
            }
            let mut ring = locs.clone();
            ring.push(locs[0]);
            Ok(SpecialGeometry::WhiteOut { id: obj.id, ring })
        }
        SpecialObjectKind::Descriptions => match locs.as_slice() {
            [a, b] => Ok(SpecialGeometry::Descriptions {
                id: obj.id,
                bounds: BBox::from_corners(*a, *b),
            }),
            _ => Err(too_few("descriptions", "exactly 2")),
        },
        SpecialObjectKind::Line => {
            if locs.len() < 2 {
                return Err(too_few("line", "at least 2"));
            }
            Ok(SpecialGeometry::Line {
                id: obj.id,
                points: locs.clone(),
                color: obj.color.clone(),
                width: obj.line_width,
            })
        }
        SpecialObjectKind::Other(kind) => Err(LayoutWarning::UnknownSpecialObjectKind {
            id: obj.id,
            kind: kind.clone(),
        }),
    }
}

/// Resolve every object, collecting warnings for the ones skipped.
pub fn special_geometries<'a, I>(objects: I) -> (Vec<SpecialGeometry>, Vec<LayoutWarning>)
where
    I: IntoIterator<Item = &'a SpecialObject>,
{
    let mut shapes = Vec::new();
    let mut warnings = Vec::new();
    for obj in objects {
        match special_geometry(obj) {
            Ok(shape) => shapes.push(shape),
            Err(warning) => {
                crate::log::warn!(id = obj.id, "{}", warning);
                warnings.push(warning);
            }
        }
    }
    (shapes, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn obj(kind: &str, locations: Vec<DVec2>) -> SpecialObject {
        SpecialObject::new(7, SpecialObjectKind::from(kind.to_string()), locations)
    }

    #[test]
    fn white_out_ring_is_closed() {
        let o = obj("white-out", vec![dvec2(0.0, 0.0), dvec2(4.0, 0.0), dvec2(4.0, 3.0)]);
        let shape = special_geometry(&o).unwrap();
        let SpecialGeometry::WhiteOut { ring, .. } = &shape else {
            panic!("expected white-out");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(shape.to_locations(), o.locations);
    }

    #[test]
    fn descriptions_box_uses_min_max() {
        let o = obj("descriptions", vec![dvec2(10.0, 50.0), dvec2(40.0, 20.0)]);
        let shape = special_geometry(&o).unwrap();
        assert_eq!(shape.bounds(), BBox::from_corners(dvec2(10.0, 20.0), dvec2(40.0, 50.0)));
        assert_eq!(shape.to_locations(), vec![dvec2(10.0, 50.0), dvec2(40.0, 20.0)]);
        assert_eq!(
            shape.obstacle(),
            Geometry::Polygon(vec![
                dvec2(10.0, 20.0),
                dvec2(40.0, 20.0),
                dvec2(40.0, 50.0),
                dvec2(10.0, 50.0),
                dvec2(10.0, 20.0),
            ])
        );
    }

    #[test]
    fn line_passes_styling_through() {
        let mut o = obj("line", vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 0.0)]);
        o.color = Some("#ff00ff".into());
        o.line_width = Some(0.5);
        let shape = special_geometry(&o).unwrap();
        assert_eq!(
            shape,
            SpecialGeometry::Line {
                id: 7,
                points: o.locations.clone(),
                color: Some("#ff00ff".into()),
                width: Some(0.5),
            }
        );
        assert_eq!(shape.obstacle(), Geometry::LineString(o.locations.clone()));
    }

    #[test]
    fn unknown_kind_is_skipped_with_warning() {
        let objects = [
            obj("image", vec![dvec2(0.0, 0.0)]),
            obj("line", vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0)]),
        ];
        let (shapes, warnings) = special_geometries(&objects);
        assert_eq!(shapes.len(), 1);
        assert_eq!(
            warnings,
            vec![LayoutWarning::UnknownSpecialObjectKind {
                id: 7,
                kind: "image".into()
            }]
        );
    }

    #[test]
    fn wrong_location_counts_warn() {
        let w = special_geometry(&obj("white-out", vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0)])).unwrap_err();
        insta::assert_snapshot!(
            w.to_string(),
            @"special object 7: white-out needs at least 3 locations, got 2, skipped"
        );
        assert!(special_geometry(&obj("descriptions", vec![dvec2(0.0, 0.0)])).is_err());
        assert!(special_geometry(&obj("line", vec![])).is_err());
    }
}
