//! Course layout for orienteering maps.
//!
//! Given a course (an ordered list of controls in paper millimetres) this
//! crate computes what a renderer needs to draw it: connector lines trimmed
//! to clear the control symbols, a non-overlapping position for every
//! control number, special objects as obstacle geometry, and aggregates such
//! as course length and start-triangle rotation.
//!
//! Enable the `tracing` feature to get debug and trace events from the
//! layout pipeline.

pub mod aggregate;
pub mod course;
pub mod errors;
pub mod layout;
pub mod log;
pub mod scale;
pub mod types;

pub use course::{Control, ControlId, ControlKind, Course, CourseType, Event, SpecialObject};
pub use errors::{LayoutError, LayoutWarning};
pub use layout::{CourseLayout, LayoutInput, LayoutTarget};
pub use scale::ScaleSizes;
pub use types::{BBox, MapScale};

use miette::IntoDiagnostic;

/// Lay out one course of a JSON-encoded event and return its
/// `FeatureCollection`.
///
/// Returns an error report if the event fails to parse or the course
/// cannot be laid out.
pub fn layout_event_json(
    source: &str,
    course_id: u32,
    target: LayoutTarget,
) -> Result<serde_json::Value, miette::Report> {
    let event: Event = serde_json::from_str(source)
        .map_err(|e| miette::miette!("Invalid event: {}", e))?;
    let course = event
        .course(course_id)
        .ok_or(LayoutError::UnknownCourse { id: course_id })?;
    let layout = event.layout_course(course_id, target)?;
    layout.feature_collection(course).into_diagnostic()
}
