//! Error and warning types with miette diagnostics
//!
//! Errors are fatal to the enclosing layout: they are configuration or
//! programming mistakes and the caller is expected to surface them.
//! Warnings describe malformed course data that is skipped so the rest of
//! the course can still be laid out.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors that abort a layout computation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("unsupported geometry kind: {kind}")]
    #[diagnostic(
        code(coursekit::geometry::unsupported_kind),
        help("only Point, LineString and Polygon geometries can be measured")
    )]
    UnsupportedGeometryKind { kind: String },

    #[error("malformed geometry: {reason}")]
    #[diagnostic(code(coursekit::geometry::malformed))]
    MalformedGeometry { reason: String },

    #[error("unknown scale mode: {value}")]
    #[diagnostic(
        code(coursekit::scale::unknown_mode),
        help("expected one of RelativeToMap, RelativeTo15000, None")
    )]
    UnknownScaleMode { value: String },

    #[error("unknown course type: {value}")]
    #[diagnostic(
        code(coursekit::course::unknown_type),
        help("expected one of normal, score, all-controls")
    )]
    UnknownCourseType { value: String },

    #[error("invalid map scale {value}: {source}")]
    #[diagnostic(code(coursekit::scale::invalid_map_scale))]
    InvalidMapScale {
        value: f64,
        #[source]
        source: NumericError,
    },

    #[error("invalid print scale {value}: {source}")]
    #[diagnostic(
        code(coursekit::scale::invalid_print_scale),
        help("the course print scale is a positive denominator such as 10000")
    )]
    InvalidPrintScale {
        value: f64,
        #[source]
        source: NumericError,
    },

    #[error("invalid CRS scale {value}: {source}")]
    #[diagnostic(code(coursekit::scale::invalid_crs_scale))]
    InvalidCrsScale {
        value: f64,
        #[source]
        source: NumericError,
    },

    #[error("no course with id {id}")]
    #[diagnostic(code(coursekit::event::unknown_course))]
    UnknownCourse { id: u32 },
}

// ============================================================================
// Layout Warnings
// ============================================================================

/// Non-fatal problems found while reading course data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    #[error("special object {id}: unknown kind `{kind}`, skipped")]
    UnknownSpecialObjectKind { id: u32, kind: String },

    #[error("special object {id}: {kind} needs {expected} locations, got {got}, skipped")]
    TooFewLocations {
        id: u32,
        kind: &'static str,
        expected: &'static str,
        got: usize,
    },
}
