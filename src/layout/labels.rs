//! Control number placement
//!
//! Labels are placed greedily in course order. For each numbered control a
//! ring of candidate points is swept at a fixed distance from the control,
//! and the candidate furthest from everything nearby wins (maximin). Every
//! placed label becomes an obstacle for the controls after it, so the
//! result depends on control order and must always be recomputed in that
//! order.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::connectors::Connector;
use super::defaults::{
    CircleDiameter, LABEL_ANGLE_STEP, LABEL_CANDIDATES, LABEL_PRUNE_FACTOR, LABEL_START_ANGLE,
    LABEL_TIE_TOLERANCE, NUMBER_CIRCLE_CUSHION, TEXT_CUSHION,
};
use super::geometry::{Geometry, point_to_geometry_distance};
use crate::course::{Control, LabelKind};

/// A placed control number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLabel {
    pub control: Control,
    pub label: String,
    pub position: DVec2,
}

/// Inputs that size and name the labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSettings {
    pub scale: f64,
    pub diameter: CircleDiameter,
    pub label_kind: LabelKind,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            diameter: CircleDiameter::Isom,
            label_kind: LabelKind::Sequence,
        }
    }
}

/// Distance from a control's center to its number.
pub fn text_distance(diameter: CircleDiameter, scale: f64) -> f64 {
    (diameter.mm() / 2.0 + NUMBER_CIRCLE_CUSHION * scale) * scale + TEXT_CUSHION
}

/// Candidate label positions in sweep order, starting upper right.
pub fn candidates(center: DVec2, distance: f64) -> impl Iterator<Item = DVec2> {
    (0..LABEL_CANDIDATES).map(move |k| {
        let angle = LABEL_START_ANGLE + k as f64 * LABEL_ANGLE_STEP;
        center + DVec2::from_angle(angle) * distance
    })
}

/// Smallest distance from `point` to any of `obstacles` (infinite if none).
fn clearance(point: DVec2, obstacles: &[&Geometry]) -> f64 {
    obstacles
        .iter()
        .map(|g| point_to_geometry_distance(point, g))
        .fold(f64::INFINITY, f64::min)
}

/// Pick the candidate with the largest clearance; ties go to the earliest.
///
/// A later candidate has to beat the best so far by more than
/// [`LABEL_TIE_TOLERANCE`], so rounding noise never reorders equal scores.
fn best_candidate(center: DVec2, distance: f64, obstacles: &[&Geometry]) -> (usize, DVec2, f64) {
    let mut best = (0, center + DVec2::from_angle(LABEL_START_ANGLE) * distance, f64::NEG_INFINITY);
    for (k, candidate) in candidates(center, distance).enumerate() {
        let score = clearance(candidate, obstacles);
        if score > best.2 + LABEL_TIE_TOLERANCE {
            best = (k, candidate, score);
        }
    }
    best
}

fn label_text(control: &Control, ordinal: usize, kind: LabelKind) -> String {
    match (kind, control.code) {
        (LabelKind::Code, Some(code)) => code.to_string(),
        _ => ordinal.to_string(),
    }
}

/// Place a number for every control that is neither start nor finish.
///
/// `obstacles` holds pre-existing geometry (special objects and anything
/// else the caller wants kept clear); control points and connector legs are
/// added here.
pub fn place_labels(
    controls: &[Control],
    connectors: &[Option<Connector>],
    obstacles: &[Geometry],
    settings: &LabelSettings,
) -> Vec<NumberLabel> {
    let distance = text_distance(settings.diameter, settings.scale);
    let prune = distance * LABEL_PRUNE_FACTOR;

    let control_points: Vec<Geometry> =
        controls.iter().map(|c| Geometry::Point(c.coordinates)).collect();
    let legs: Vec<Geometry> = connectors.iter().flatten().map(Connector::geometry).collect();

    let (labels, _placed) = controls
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind.is_numbered())
        .fold(
            (Vec::new(), Vec::<Geometry>::new()),
            |(mut labels, mut placed), (index, control)| {
                let center = control.coordinates;
                let position = match control.number_location {
                    Some(offset) => center + offset,
                    None => {
                        let nearby: Vec<&Geometry> = control_points
                            .iter()
                            .enumerate()
                            .filter(|(other, _)| *other != index)
                            .map(|(_, g)| g)
                            .chain(legs.iter())
                            .chain(obstacles.iter())
                            .chain(placed.iter())
                            .filter(|g| point_to_geometry_distance(center, g) <= prune)
                            .collect();
                        // Index and score only feed the trace event
                        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
                        let (k, position, score) = best_candidate(center, distance, &nearby);
                        crate::log::trace!(
                            control = control.id.0,
                            candidate = k,
                            score,
                            nearby = nearby.len(),
                            "placed number"
                        );
                        position
                    }
                };

                placed.push(Geometry::Point(position));
                let label = label_text(control, labels.len() + 1, settings.label_kind);
                labels.push(NumberLabel {
                    control: control.clone(),
                    label,
                    position,
                });
                (labels, placed)
            },
        );

    labels
}
