//! Course symbol shapes
//!
//! Each control kind has its own symbol type that knows:
//! - how far connectors have to stay clear of its center
//! - its outline, for renderers that draw it

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};
use std::f64::consts::TAU;

use super::defaults::{
    CircleDiameter, FINISH_INNER_RADIUS, FINISH_OUTER_RADIUS, LINE_WIDTH, RING_SEGMENTS,
    START_TRIANGLE_RADIUS,
};
use super::geometry::Geometry;
use crate::course::{Control, ControlKind};

/// Common behavior for all course symbols
#[enum_dispatch]
pub trait Symbol {
    /// The point the symbol is drawn around
    fn center(&self) -> DVec2;

    /// Distance from the center connectors must keep, before object scaling
    fn clearance(&self) -> f64;

    /// Stroke centerlines of the symbol at the given object scale
    fn outline(&self, scale: f64) -> Vec<Geometry>;
}

/// Start triangle, apex toward the first control
#[derive(Debug, Clone, PartialEq)]
pub struct StartTriangle {
    pub center: DVec2,
    /// Start rotation in degrees (apex direction minus 90)
    pub rotation: f64,
}

impl Symbol for StartTriangle {
    fn center(&self) -> DVec2 {
        self.center
    }

    fn clearance(&self) -> f64 {
        START_TRIANGLE_RADIUS
    }

    fn outline(&self, scale: f64) -> Vec<Geometry> {
        let apex = (self.rotation + 90.0).to_radians();
        let r = START_TRIANGLE_RADIUS * scale;
        let mut ring: Vec<DVec2> = (0..3)
            .map(|i| self.center + DVec2::from_angle(apex + i as f64 * TAU / 3.0) * r)
            .collect();
        ring.push(ring[0]);
        vec![Geometry::Polygon(ring)]
    }
}

/// Control circle
#[derive(Debug, Clone, PartialEq)]
pub struct ControlCircle {
    pub center: DVec2,
    pub diameter: CircleDiameter,
}

impl Symbol for ControlCircle {
    fn center(&self) -> DVec2 {
        self.center
    }

    fn clearance(&self) -> f64 {
        self.diameter.mm() / 2.0 + LINE_WIDTH / 2.0
    }

    fn outline(&self, scale: f64) -> Vec<Geometry> {
        // The outside diameter includes the stroke
        let r = (self.diameter.mm() - LINE_WIDTH) / 2.0 * scale;
        vec![ring(self.center, r)]
    }
}

/// Finish double ring
#[derive(Debug, Clone, PartialEq)]
pub struct FinishRings {
    pub center: DVec2,
}

impl Symbol for FinishRings {
    fn center(&self) -> DVec2 {
        self.center
    }

    fn clearance(&self) -> f64 {
        FINISH_OUTER_RADIUS + LINE_WIDTH / 2.0
    }

    fn outline(&self, scale: f64) -> Vec<Geometry> {
        vec![
            ring(self.center, FINISH_INNER_RADIUS * scale),
            ring(self.center, FINISH_OUTER_RADIUS * scale),
        ]
    }
}

/// Enum holding any course symbol
#[enum_dispatch(Symbol)]
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolEnum {
    StartTriangle,
    ControlCircle,
    FinishRings,
}

impl SymbolEnum {
    /// Symbol drawn for a control. `rotation` only affects the start triangle.
    pub fn for_control(control: &Control, diameter: CircleDiameter, rotation: f64) -> Self {
        let center = control.coordinates;
        match control.kind {
            ControlKind::Start => StartTriangle { center, rotation }.into(),
            ControlKind::Normal => ControlCircle { center, diameter }.into(),
            ControlKind::Finish => FinishRings { center }.into(),
        }
    }
}

/// Clearance connectors keep from a control, before object scaling.
pub fn spacing(control: &Control, diameter: CircleDiameter) -> f64 {
    SymbolEnum::for_control(control, diameter, 0.0).clearance()
}

fn ring(center: DVec2, radius: f64) -> Geometry {
    let pts = (0..=RING_SEGMENTS)
        .map(|i| {
            let a = (i % RING_SEGMENTS) as f64 * TAU / RING_SEGMENTS as f64;
            center + dvec2(a.cos(), a.sin()) * radius
        })
        .collect();
    Geometry::Polygon(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::ControlId;
    use crate::layout::geometry::point_to_geometry_distance;

    fn control(kind: ControlKind) -> Control {
        Control::new(ControlId(1), kind, dvec2(10.0, 20.0))
    }

    #[test]
    fn clearance_per_kind() {
        assert_eq!(spacing(&control(ControlKind::Start), CircleDiameter::Isom), START_TRIANGLE_RADIUS);
        assert_eq!(spacing(&control(ControlKind::Normal), CircleDiameter::Isom), 2.5 + 0.175);
        assert_eq!(spacing(&control(ControlKind::Normal), CircleDiameter::Legacy), 2.95 + 0.175);
        assert!((spacing(&control(ControlKind::Finish), CircleDiameter::Isom) - 3.175).abs() < 1e-12);
    }

    #[test]
    fn start_triangle_apex_points_along_rotation() {
        // rotation 0 means the next control is straight up
        let tri = StartTriangle { center: dvec2(0.0, 0.0), rotation: 0.0 };
        let Geometry::Polygon(ring) = &tri.outline(1.0)[0] else {
            panic!("triangle outline should be a polygon");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
        assert!(ring[0].x.abs() < 1e-12);
        assert!((ring[0].y - START_TRIANGLE_RADIUS).abs() < 1e-12);
    }

    #[test]
    fn circle_outline_is_centerline() {
        let sym = SymbolEnum::for_control(&control(ControlKind::Normal), CircleDiameter::Isom, 0.0);
        let outline = sym.outline(2.0);
        assert_eq!(outline.len(), 1);
        // Vertices sit on the stroke centerline radius
        let d = point_to_geometry_distance(sym.center(), &outline[0]);
        assert!(d <= (5.0 - 0.35) / 2.0 * 2.0 + 1e-9);
        assert!(d > 4.5);
    }

    #[test]
    fn finish_has_two_rings() {
        let sym = SymbolEnum::for_control(&control(ControlKind::Finish), CircleDiameter::Isom, 0.0);
        assert_eq!(sym.outline(1.0).len(), 2);
    }
}
